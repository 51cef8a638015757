//! Telegram reader loop
//!
//! Drives a byte source through the frame assembler until a complete
//! telegram is available. Bytes left over in a chunk after a completed frame
//! are retained, so back-to-back frames inside one chunk are all delivered.

use crate::assembler::TelegramAssembler;
use crate::error::{SmartyError, SmartyResult};
use crate::telegram::Telegram;
use bytes::BytesMut;
use smarty_transport::StreamAccessor;
use std::time::Duration;

/// Size of the chunk buffer used to pull bytes from the source
pub const READ_BUFFER_SIZE: usize = 4096;

/// Reader loop assembling telegrams from a byte source
///
/// Owns its assembler and the underlying stream exclusively for its
/// lifetime; one reader per connection.
#[derive(Debug)]
pub struct TelegramReader<S: StreamAccessor> {
    stream: S,
    assembler: TelegramAssembler,
    buf: BytesMut,
    start: usize,
    end: usize,
}

impl<S: StreamAccessor> TelegramReader<S> {
    /// Create a reader over an open byte source
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            assembler: TelegramAssembler::new(),
            buf: BytesMut::zeroed(READ_BUFFER_SIZE),
            start: 0,
            end: 0,
        }
    }

    /// Wait for and assemble the next complete telegram
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-read timeout passed to the byte source. None means
    ///   the reader blocks until data arrives.
    ///
    /// # Errors
    ///
    /// `Timeout` if the source stalls beyond the timeout, `Connection` if it
    /// fails or reaches end of stream. Both are terminal for the reader loop;
    /// framing errors are recovered internally by resynchronization.
    pub async fn next_telegram(&mut self, timeout: Option<Duration>) -> SmartyResult<Telegram> {
        self.stream.set_timeout(timeout).await?;

        loop {
            while self.start < self.end {
                let byte = self.buf[self.start];
                self.start += 1;
                if self.assembler.feed(byte) {
                    return Ok(self.assembler.take_telegram());
                }
            }

            let n = self.stream.read(&mut self.buf[..]).await?;
            if n == 0 {
                return Err(SmartyError::Connection(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "Byte source reached end of stream",
                )));
            }
            self.start = 0;
            self.end = n;
        }
    }

    /// Get mutable access to the underlying stream
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Check if the underlying stream is closed
    pub fn is_closed(&self) -> bool {
        self.stream.is_closed()
    }

    /// Close the underlying stream
    pub async fn close(&mut self) -> SmartyResult<()> {
        self.stream.close().await
    }

    /// Consume the reader and return the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}
