//! Builder for meter reader clients
//!
//! Collects the configuration shared by both client flavours before the
//! transport is attached.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use smarty_client::ReaderBuilder;
//! use smarty_transport::{SerialSettings, SerialTransport};
//!
//! # fn main() -> smarty_core::SmartyResult<()> {
//! let transport =
//!     SerialTransport::new(SerialSettings::meter_default("/dev/ttyUSB0".to_string()));
//! let client = ReaderBuilder::new()
//!     .key("000102030405060708090A0B0C0D0E0F")
//!     .build_decryptor(transport)?;
//! # Ok(())
//! # }
//! ```

use crate::decryptor::OnlineDecryptor;
use crate::error::{SmartyError, SmartyResult};
use crate::forwarder::CipherForwarder;
use crate::retry::RetryPolicy;
use smarty_security::{TelegramDecryptor, AAD_LENGTH, DEFAULT_AAD};
use smarty_transport::TransportLayer;
use std::time::Duration;

/// Builder for [`OnlineDecryptor`] and [`CipherForwarder`]
#[derive(Debug, Clone)]
pub struct ReaderBuilder {
    key_hex: Option<String>,
    aad: [u8; AAD_LENGTH],
    timeout: Option<Duration>,
    retry: RetryPolicy,
}

impl ReaderBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self {
            key_hex: None,
            aad: DEFAULT_AAD,
            timeout: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the device key (32 hex characters); required for a decryptor
    pub fn key(mut self, key_hex: impl Into<String>) -> Self {
        self.key_hex = Some(key_hex.into());
        self
    }

    /// Override the additional authenticated data
    pub fn aad(mut self, aad: [u8; AAD_LENGTH]) -> Self {
        self.aad = aad;
        self
    }

    /// Set the per-read timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the retry policy for decryption failures
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Build an online decryptor over the given transport
    ///
    /// # Errors
    ///
    /// `KeyConfiguration` if no key was set or the key does not validate.
    pub fn build_decryptor<T: TransportLayer>(
        self,
        transport: T,
    ) -> SmartyResult<OnlineDecryptor<T>> {
        let key_hex = self.key_hex.ok_or_else(|| {
            SmartyError::KeyConfiguration("No decryption key configured".to_string())
        })?;
        let decryptor = TelegramDecryptor::with_aad(&key_hex, self.aad)?;

        let mut client = OnlineDecryptor::with_decryptor(transport, decryptor);
        client.set_retry_policy(self.retry);
        client.set_timeout(self.timeout);
        Ok(client)
    }

    /// Build a cipher forwarder over the given transport
    pub fn build_forwarder<T: TransportLayer>(self, transport: T) -> CipherForwarder<T> {
        let mut client = CipherForwarder::new(transport);
        client.set_timeout(self.timeout);
        client
    }
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarty_transport::ReplayTransport;

    #[test]
    fn test_build_decryptor_requires_key() {
        let result = ReaderBuilder::new().build_decryptor(ReplayTransport::from_bytes(&[]));
        assert!(matches!(result, Err(SmartyError::KeyConfiguration(_))));
    }

    #[test]
    fn test_build_decryptor_validates_key() {
        let result = ReaderBuilder::new()
            .key("too-short")
            .build_decryptor(ReplayTransport::from_bytes(&[]));
        assert!(matches!(result, Err(SmartyError::KeyConfiguration(_))));
    }

    #[test]
    fn test_build_decryptor_with_valid_key() {
        let client = ReaderBuilder::new()
            .key("000102030405060708090A0B0C0D0E0F")
            .retry_policy(RetryPolicy::no_retry())
            .timeout(Duration::from_secs(10))
            .build_decryptor(ReplayTransport::from_bytes(&[]));
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_forwarder() {
        let forwarder = ReaderBuilder::new()
            .timeout(Duration::from_secs(10))
            .build_forwarder(ReplayTransport::from_bytes(&[]));
        assert!(!forwarder.is_closed());
    }
}
