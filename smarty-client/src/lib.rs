//! High-level clients for the smarty meter reader
//!
//! Two consumers of the assembled telegram stream:
//!
//! - [`OnlineDecryptor`] reads telegrams and decrypts them locally;
//! - [`CipherForwarder`] reads telegrams and hands out their cryptographic
//!   components for decryption elsewhere.
//!
//! [`OnlineDecryptor`]: decryptor::OnlineDecryptor
//! [`CipherForwarder`]: forwarder::CipherForwarder

pub mod builder;
pub mod decryptor;
pub mod error;
pub mod forwarder;
pub mod retry;

pub use builder::ReaderBuilder;
pub use decryptor::OnlineDecryptor;
pub use error::{SmartyError, SmartyResult};
pub use forwarder::CipherForwarder;
pub use retry::RetryPolicy;
