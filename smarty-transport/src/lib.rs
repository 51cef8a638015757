//! Transport layer for the smarty meter reader
//!
//! This crate provides the byte-source abstraction consumed by the telegram
//! reader, together with a serial port implementation and an in-memory
//! replay implementation for captured streams.

pub mod error;
pub mod replay;
pub mod serial;
pub mod stream;

pub use error::{SmartyError, SmartyResult};
pub use replay::ReplayTransport;
pub use serial::{SerialSettings, SerialTransport, METER_BAUD_RATE};
pub use stream::{StreamAccessor, TransportLayer};
