//! Security layer for the smarty meter reader
//!
//! This crate provides authenticated encryption and decryption of telegram
//! payloads with AES-128-GCM and the meter's 12-byte authentication tag.

pub mod constants;
pub mod decryptor;
pub mod error;

pub use constants::{AAD_LENGTH, DEFAULT_AAD, KEY_HEX_LENGTH};
pub use decryptor::TelegramDecryptor;
pub use error::{SmartyError, SmartyResult};
