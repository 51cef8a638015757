//! Telegram data model and wire encoding

use crate::error::{SmartyError, SmartyResult};
use smarty_core::{FRAME_COUNTER_LENGTH, GCM_TAG_LENGTH};

/// Start marker opening every telegram frame
pub const START_BYTE: u8 = 0xDB;

/// Separator preceding the two-byte payload length
pub const SEPARATOR_PAYLOAD_LENGTH: u8 = 0x82;

/// Separator preceding the frame counter
pub const SEPARATOR_FRAME_COUNTER: u8 = 0x30;

/// Fixed protocol overhead included in the declared length
///
/// The declared length counts the separators, the frame counter and the tag
/// framing in addition to the ciphertext, so the ciphertext length is always
/// `declared_length - 17`.
pub const DECLARED_LENGTH_OVERHEAD: usize = 17;

/// One complete meter-reading message as transmitted over the serial link
///
/// Wire layout (all integers big-endian):
///
/// | Field            | Size  | Constraint                  |
/// |------------------|-------|-----------------------------|
/// | Start marker     | 1     | `0xDB`                      |
/// | Title length `N` | 1     |                             |
/// | System title     | `N`   | opaque                      |
/// | Separator        | 1     | `0x82`                      |
/// | Payload length `L` | 2   | declared total length       |
/// | Separator        | 1     | `0x30`                      |
/// | Frame counter    | 4     | opaque, part of the nonce   |
/// | Payload          | `L - 17` | ciphertext               |
/// | GCM tag          | 12    |                             |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Telegram {
    pub(crate) system_title: Vec<u8>,
    pub(crate) frame_counter: Vec<u8>,
    pub(crate) payload: Vec<u8>,
    pub(crate) gcm_tag: Vec<u8>,
    pub(crate) declared_length: usize,
}

impl Telegram {
    /// Create a telegram from its fields, validating the wire constraints
    pub fn new(
        system_title: Vec<u8>,
        frame_counter: Vec<u8>,
        payload: Vec<u8>,
        gcm_tag: Vec<u8>,
    ) -> SmartyResult<Self> {
        if system_title.len() > u8::MAX as usize {
            return Err(SmartyError::FrameInvalid(format!(
                "System title too long: {} bytes",
                system_title.len()
            )));
        }
        if frame_counter.len() != FRAME_COUNTER_LENGTH {
            return Err(SmartyError::FrameInvalid(format!(
                "Frame counter must be {} bytes, got {}",
                FRAME_COUNTER_LENGTH,
                frame_counter.len()
            )));
        }
        if gcm_tag.len() != GCM_TAG_LENGTH {
            return Err(SmartyError::FrameInvalid(format!(
                "GCM tag must be {} bytes, got {}",
                GCM_TAG_LENGTH,
                gcm_tag.len()
            )));
        }
        let declared_length = payload.len() + DECLARED_LENGTH_OVERHEAD;
        if declared_length > u16::MAX as usize {
            return Err(SmartyError::FrameInvalid(format!(
                "Payload too long: {} bytes",
                payload.len()
            )));
        }

        Ok(Self {
            system_title,
            frame_counter,
            payload,
            gcm_tag,
            declared_length,
        })
    }

    /// Get the system title
    pub fn system_title(&self) -> &[u8] {
        &self.system_title
    }

    /// Get the frame counter
    pub fn frame_counter(&self) -> &[u8] {
        &self.frame_counter
    }

    /// Get the ciphertext payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the GCM authentication tag
    pub fn gcm_tag(&self) -> &[u8] {
        &self.gcm_tag
    }

    /// Get the total length declared in the frame header
    pub fn declared_length(&self) -> usize {
        self.declared_length
    }

    /// Build the AES-GCM initial value: system title followed by frame counter
    pub fn initial_value(&self) -> Vec<u8> {
        let mut iv = Vec::with_capacity(self.system_title.len() + self.frame_counter.len());
        iv.extend_from_slice(&self.system_title);
        iv.extend_from_slice(&self.frame_counter);
        iv
    }

    /// Build the ciphertext with the tag appended, as expected by the decryptor
    pub fn cipher_with_tag(&self) -> Vec<u8> {
        let mut cipher = Vec::with_capacity(self.payload.len() + self.gcm_tag.len());
        cipher.extend_from_slice(&self.payload);
        cipher.extend_from_slice(&self.gcm_tag);
        cipher
    }

    /// Split the telegram into its cryptographic components without decrypting
    pub fn into_components(self) -> CipherComponents {
        let initial_value = self.initial_value();
        CipherComponents {
            initial_value,
            ciphertext: self.payload,
            gcm_tag: self.gcm_tag,
        }
    }

    /// Encode the telegram to its wire representation
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.system_title.len() + 4 + self.declared_length);
        out.push(START_BYTE);
        out.push(self.system_title.len() as u8);
        out.extend_from_slice(&self.system_title);
        out.push(SEPARATOR_PAYLOAD_LENGTH);
        out.extend_from_slice(&(self.declared_length as u16).to_be_bytes());
        out.push(SEPARATOR_FRAME_COUNTER);
        out.extend_from_slice(&self.frame_counter);
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(&self.gcm_tag);
        out
    }
}

/// Cryptographic material of a telegram, for decryption elsewhere
///
/// Produced by the cipher-forwarding path instead of decrypting locally, for
/// instance to relay a telegram over an insecure channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherComponents {
    /// AES-GCM initial value (system title + frame counter)
    pub initial_value: Vec<u8>,
    /// Ciphertext without the tag
    pub ciphertext: Vec<u8>,
    /// AES-GCM authentication tag
    pub gcm_tag: Vec<u8>,
}
