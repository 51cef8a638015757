//! smarty - reading encrypted smart-meter telegrams in Rust
//!
//! The meter pushes AES-GCM-encrypted telegrams over its serial port inside
//! a binary wrapper frame. This library reassembles the byte stream into
//! frames and either decrypts them locally or hands out the cryptographic
//! material for decryption elsewhere.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `smarty-core`: Error handling and shared protocol constants
//! - `smarty-transport`: Byte sources (Serial, Replay)
//! - `smarty-framing`: Frame assembler state machine and reader loop
//! - `smarty-security`: AES-128-GCM telegram decryption
//! - `smarty-client`: High-level clients (online decryption, cipher forwarding)
//!
//! # Usage
//!
//! ```no_run
//! use smarty::client::OnlineDecryptor;
//!
//! # async fn run() -> smarty::SmartyResult<()> {
//! let mut reader =
//!     OnlineDecryptor::connect("/dev/ttyUSB0", "000102030405060708090A0B0C0D0E0F").await?;
//! let plaintext = reader.next_telegram().await?;
//! println!("{}", String::from_utf8_lossy(&plaintext));
//! reader.close().await?;
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use smarty_core::{SmartyError, SmartyResult};
pub use smarty_framing::{CipherComponents, Telegram, TelegramAssembler, TelegramReader};
pub use smarty_security::{TelegramDecryptor, DEFAULT_AAD};

// Re-export client API
pub mod client {
    pub use smarty_client::*;
}

// Re-export transports
pub mod transport {
    pub use smarty_transport::*;
}
