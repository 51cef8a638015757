//! Authenticated encryption and decryption of telegram payloads

use crate::constants::{AAD_LENGTH, DEFAULT_AAD, KEY_HEX_LENGTH};
use crate::error::{SmartyError, SmartyResult};
use aes::cipher::generic_array::typenum::U12;
use aes::Aes128;
use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    AesGcm, Key, Nonce,
};
use smarty_core::{GCM_TAG_LENGTH, KEY_LENGTH, NONCE_LENGTH};

/// AES-128-GCM with the meter's 12-byte nonce and 12-byte authentication tag
type MeterCipher = AesGcm<Aes128, U12, U12>;

/// Telegram decryption context
///
/// Constructed once with the hex-encoded device key; the key is validated at
/// construction and a wrong length or invalid hex is a hard error, never a
/// context that fails every later call.
pub struct TelegramDecryptor {
    cipher: MeterCipher,
    aad: [u8; AAD_LENGTH],
}

impl TelegramDecryptor {
    /// Create a decryptor with the meter's default additional authenticated data
    ///
    /// # Arguments
    ///
    /// * `key_hex` - The device key as exactly 32 hex characters
    pub fn new(key_hex: &str) -> SmartyResult<Self> {
        Self::with_aad(key_hex, DEFAULT_AAD)
    }

    /// Create a decryptor with custom additional authenticated data
    pub fn with_aad(key_hex: &str, aad: [u8; AAD_LENGTH]) -> SmartyResult<Self> {
        let key = decode_key(key_hex)?;
        let cipher = MeterCipher::new(Key::<MeterCipher>::from_slice(&key));
        Ok(Self { cipher, aad })
    }

    /// Decrypt a telegram
    ///
    /// # Arguments
    ///
    /// * `initial_value` - The 12-byte nonce (system title + frame counter)
    /// * `cipher_with_tag` - The ciphertext with the 12-byte GCM tag appended
    ///
    /// # Errors
    ///
    /// `Authentication` if the tag does not verify (tampering, wrong key, or
    /// corrupted data). No plaintext is ever returned in that case.
    pub fn decrypt(&self, initial_value: &[u8], cipher_with_tag: &[u8]) -> SmartyResult<Vec<u8>> {
        if initial_value.len() != NONCE_LENGTH {
            return Err(SmartyError::Security(format!(
                "Invalid initial value length: expected {} bytes, got {}",
                NONCE_LENGTH,
                initial_value.len()
            )));
        }
        if cipher_with_tag.len() < GCM_TAG_LENGTH {
            return Err(SmartyError::Security(format!(
                "Ciphertext shorter than the {}-byte tag: {} bytes",
                GCM_TAG_LENGTH,
                cipher_with_tag.len()
            )));
        }

        let nonce = Nonce::from_slice(initial_value);
        let payload = Payload {
            msg: cipher_with_tag,
            aad: &self.aad,
        };

        self.cipher
            .decrypt(nonce, payload)
            .map_err(|_| SmartyError::Authentication)
    }

    /// Encrypt a plaintext telegram, returning the ciphertext with the tag appended
    ///
    /// The counterpart of [`decrypt`], used to construct frames when
    /// simulating a meter.
    ///
    /// [`decrypt`]: TelegramDecryptor::decrypt
    pub fn encrypt(&self, initial_value: &[u8], plaintext: &[u8]) -> SmartyResult<Vec<u8>> {
        if initial_value.len() != NONCE_LENGTH {
            return Err(SmartyError::Security(format!(
                "Invalid initial value length: expected {} bytes, got {}",
                NONCE_LENGTH,
                initial_value.len()
            )));
        }

        let nonce = Nonce::from_slice(initial_value);
        let payload = Payload {
            msg: plaintext,
            aad: &self.aad,
        };

        self.cipher
            .encrypt(nonce, payload)
            .map_err(|e| SmartyError::Security(format!("Encryption failed: {}", e)))
    }
}

fn decode_key(key_hex: &str) -> SmartyResult<[u8; KEY_LENGTH]> {
    if key_hex.len() != KEY_HEX_LENGTH {
        return Err(SmartyError::KeyConfiguration(format!(
            "Invalid decryption key length: required {} hex characters, found {}",
            KEY_HEX_LENGTH,
            key_hex.len()
        )));
    }

    let bytes = hex::decode(key_hex).map_err(|e| {
        SmartyError::KeyConfiguration(format!("Error parsing the decryption key: {}", e))
    })?;

    bytes.try_into().map_err(|_| {
        SmartyError::KeyConfiguration("Decryption key must be 16 bytes".to_string())
    })
}
