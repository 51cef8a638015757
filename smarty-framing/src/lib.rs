//! Framing layer for the smarty meter reader
//!
//! This crate reassembles the raw serial byte stream into discrete telegram
//! frames. The [`assembler::TelegramAssembler`] consumes the stream one byte
//! at a time and signals when a complete frame has been read; the
//! [`reader::TelegramReader`] drives a byte source through the assembler.

pub mod assembler;
pub mod error;
pub mod reader;
pub mod telegram;

pub use assembler::{assemble_from_slice, AssemblerState, TelegramAssembler};
pub use error::{SmartyError, SmartyResult};
pub use reader::{TelegramReader, READ_BUFFER_SIZE};
pub use telegram::{
    CipherComponents, Telegram, DECLARED_LENGTH_OVERHEAD, SEPARATOR_FRAME_COUNTER,
    SEPARATOR_PAYLOAD_LENGTH, START_BYTE,
};
