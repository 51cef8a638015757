//! Cipher forwarding
//!
//! Reads telegrams but, instead of decrypting them, returns the parts needed
//! for decryption at a later date, for instance after transmitting them over
//! an insecure channel.

use crate::error::SmartyResult;
use smarty_framing::{CipherComponents, TelegramReader};
use smarty_transport::{SerialSettings, SerialTransport, TransportLayer};
use std::time::Duration;

/// Client reading telegrams and handing out their cryptographic components
pub struct CipherForwarder<T: TransportLayer> {
    reader: TelegramReader<T>,
    timeout: Option<Duration>,
}

impl<T: TransportLayer> CipherForwarder<T> {
    /// Create a cipher forwarder over a transport
    pub fn new(transport: T) -> Self {
        Self {
            reader: TelegramReader::new(transport),
            timeout: None,
        }
    }

    /// Open the underlying transport
    pub async fn open(&mut self) -> SmartyResult<()> {
        self.reader.stream_mut().open().await
    }

    /// Set the per-read timeout. None blocks until data arrives.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Wait for the next telegram and split it into its components
    ///
    /// The returned ciphertext does not include the tag; a decryptor fed
    /// from these components must append the tag to the ciphertext again.
    pub async fn next_components(&mut self) -> SmartyResult<CipherComponents> {
        let telegram = self.reader.next_telegram(self.timeout).await?;
        Ok(telegram.into_components())
    }

    /// Check if the underlying transport is closed
    pub fn is_closed(&self) -> bool {
        self.reader.is_closed()
    }

    /// Disconnect the byte source
    pub async fn close(&mut self) -> SmartyResult<()> {
        self.reader.close().await
    }
}

impl CipherForwarder<SerialTransport> {
    /// Connect to a meter on a serial port with the fixed line settings
    pub async fn connect(port_name: &str) -> SmartyResult<Self> {
        let transport = SerialTransport::new(SerialSettings::meter_default(port_name.to_string()));
        let mut client = Self::new(transport);
        client.open().await?;
        Ok(client)
    }
}
