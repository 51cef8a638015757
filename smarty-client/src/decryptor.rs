//! Online telegram decryption
//!
//! Listens to a byte source, assembles telegrams and decrypts them locally.

use crate::error::{SmartyError, SmartyResult};
use crate::retry::RetryPolicy;
use smarty_framing::TelegramReader;
use smarty_security::TelegramDecryptor;
use smarty_transport::{SerialSettings, SerialTransport, TransportLayer};
use std::time::Duration;

/// Client reading telegrams from a byte source and decrypting them
///
/// Owns its reader (and thereby the transport and assembler state)
/// exclusively; create one decryptor per device.
pub struct OnlineDecryptor<T: TransportLayer> {
    reader: TelegramReader<T>,
    decryptor: TelegramDecryptor,
    retry: RetryPolicy,
    timeout: Option<Duration>,
}

impl<T: TransportLayer> OnlineDecryptor<T> {
    /// Create an online decryptor over a transport
    ///
    /// # Arguments
    ///
    /// * `transport` - The byte source; opened via [`open`]
    /// * `key_hex` - The device key as exactly 32 hex characters
    ///
    /// # Errors
    ///
    /// `KeyConfiguration` if the key is not valid hex of the required length.
    ///
    /// [`open`]: OnlineDecryptor::open
    pub fn new(transport: T, key_hex: &str) -> SmartyResult<Self> {
        Ok(Self {
            reader: TelegramReader::new(transport),
            decryptor: TelegramDecryptor::new(key_hex)?,
            retry: RetryPolicy::default(),
            timeout: None,
        })
    }

    /// Create an online decryptor with an existing decryption context
    pub fn with_decryptor(transport: T, decryptor: TelegramDecryptor) -> Self {
        Self {
            reader: TelegramReader::new(transport),
            decryptor,
            retry: RetryPolicy::default(),
            timeout: None,
        }
    }

    /// Open the underlying transport
    pub async fn open(&mut self) -> SmartyResult<()> {
        self.reader.stream_mut().open().await
    }

    /// Set the retry policy applied by [`next_telegram`]
    ///
    /// [`next_telegram`]: OnlineDecryptor::next_telegram
    pub fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry = policy;
    }

    /// Set the per-read timeout. None blocks until data arrives.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Wait for the next telegram and decrypt it
    ///
    /// Telegrams that fail authentication are skipped and retried up to the
    /// configured policy's `max_attempts`, pausing `backoff` between
    /// attempts; afterwards `RetriesExhausted` is returned. Transport
    /// failures are surfaced immediately.
    pub async fn next_telegram(&mut self) -> SmartyResult<Vec<u8>> {
        for attempt in 1..=self.retry.max_attempts {
            let telegram = self.reader.next_telegram(self.timeout).await?;

            match self
                .decryptor
                .decrypt(&telegram.initial_value(), &telegram.cipher_with_tag())
            {
                Ok(plaintext) => return Ok(plaintext),
                Err(SmartyError::Authentication) => {
                    log::warn!(
                        "Telegram failed authentication (attempt {}/{})",
                        attempt,
                        self.retry.max_attempts
                    );
                    if attempt < self.retry.max_attempts && !self.retry.backoff.is_zero() {
                        tokio::time::sleep(self.retry.backoff).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(SmartyError::RetriesExhausted {
            attempts: self.retry.max_attempts,
        })
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

impl OnlineDecryptor<SerialTransport> {
    /// Connect to a meter on a serial port with the fixed line settings
    ///
    /// # Arguments
    ///
    /// * `port_name` - The port to listen to
    /// * `key_hex` - The device key as exactly 32 hex characters
    pub async fn connect(port_name: &str, key_hex: &str) -> SmartyResult<Self> {
        let transport = SerialTransport::new(SerialSettings::meter_default(port_name.to_string()));
        let mut client = Self::new(transport, key_hex)?;
        client.open().await?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarty_framing::Telegram;
    use smarty_security::TelegramDecryptor;
    use smarty_transport::ReplayTransport;

    const KEY: &str = "000102030405060708090A0B0C0D0E0F";

    fn encrypted_frame(counter: u8, plaintext: &[u8]) -> Vec<u8> {
        let cipher = TelegramDecryptor::new(KEY).unwrap();
        let title = b"SYSTITLE".to_vec();
        let frame_counter = vec![0x00, 0x00, 0x00, counter];

        let mut iv = title.clone();
        iv.extend_from_slice(&frame_counter);

        let mut cipher_with_tag = cipher.encrypt(&iv, plaintext).unwrap();
        let gcm_tag = cipher_with_tag.split_off(cipher_with_tag.len() - 12);

        Telegram::new(title, frame_counter, cipher_with_tag, gcm_tag)
            .unwrap()
            .encode()
    }

    fn no_backoff(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_decrypts_telegram_from_stream() {
        let transport = ReplayTransport::from_bytes(&encrypted_frame(1, b"HELLO-METER"));
        let mut client = OnlineDecryptor::new(transport, KEY).unwrap();

        let plaintext = client.next_telegram().await.unwrap();
        assert_eq!(plaintext, b"HELLO-METER");
    }

    #[tokio::test]
    async fn test_decrypts_consecutive_telegrams() {
        let mut stream = encrypted_frame(1, b"1-0:1.8.1(000123.456*kWh)");
        stream.extend_from_slice(&encrypted_frame(2, b"1-0:2.8.1(000000.000*kWh)"));
        let transport = ReplayTransport::from_bytes(&stream);
        let mut client = OnlineDecryptor::new(transport, KEY).unwrap();

        assert_eq!(
            client.next_telegram().await.unwrap(),
            b"1-0:1.8.1(000123.456*kWh)"
        );
        assert_eq!(
            client.next_telegram().await.unwrap(),
            b"1-0:2.8.1(000000.000*kWh)"
        );
    }

    #[tokio::test]
    async fn test_retry_skips_corrupted_telegram() {
        let mut corrupted = encrypted_frame(1, b"HELLO-METER");
        let len = corrupted.len();
        corrupted[len - 1] ^= 0xFF; // corrupt one tag byte
        corrupted.extend_from_slice(&encrypted_frame(2, b"HELLO-METER"));

        let transport = ReplayTransport::from_bytes(&corrupted);
        let mut client = OnlineDecryptor::new(transport, KEY).unwrap();
        client.set_retry_policy(no_backoff(3));

        let plaintext = client.next_telegram().await.unwrap();
        assert_eq!(plaintext, b"HELLO-METER");
    }

    #[tokio::test]
    async fn test_no_retry_surfaces_authentication_failure() {
        let mut corrupted = encrypted_frame(1, b"HELLO-METER");
        let len = corrupted.len();
        corrupted[len - 1] ^= 0xFF;

        let transport = ReplayTransport::from_bytes(&corrupted);
        let mut client = OnlineDecryptor::new(transport, KEY).unwrap();
        client.set_retry_policy(RetryPolicy::no_retry());

        let result = client.next_telegram().await;
        assert!(matches!(
            result,
            Err(SmartyError::RetriesExhausted { attempts: 1 })
        ));
    }

    #[tokio::test]
    async fn test_retries_exhausted_on_persistent_corruption() {
        let mut stream = Vec::new();
        for counter in 1..=3 {
            let mut frame = encrypted_frame(counter, b"HELLO-METER");
            let len = frame.len();
            frame[len - 1] ^= 0xFF;
            stream.extend_from_slice(&frame);
        }

        let transport = ReplayTransport::from_bytes(&stream);
        let mut client = OnlineDecryptor::new(transport, KEY).unwrap();
        client.set_retry_policy(no_backoff(3));

        let result = client.next_telegram().await;
        assert!(matches!(
            result,
            Err(SmartyError::RetriesExhausted { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn test_invalid_key_fails_construction() {
        let transport = ReplayTransport::from_bytes(&[]);
        let result = OnlineDecryptor::new(transport, "not-a-key");
        assert!(matches!(result, Err(SmartyError::KeyConfiguration(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        // Stream ends before any complete frame
        let transport = ReplayTransport::from_bytes(&[0xDB, 0x08]);
        let mut client = OnlineDecryptor::new(transport, KEY).unwrap();
        client.set_retry_policy(no_backoff(3));

        let result = client.next_telegram().await;
        assert!(matches!(result, Err(SmartyError::Connection(_))));
    }
}
