//! In-memory replay transport
//!
//! Replays a pre-recorded byte stream, preserving the chunk boundaries it was
//! captured with. Used for offline decoding of captured telegram dumps and as
//! the byte source in tests.

use crate::error::{SmartyError, SmartyResult};
use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

/// Byte source that replays queued chunks, then reports EOF
///
/// A single `read` call never crosses a chunk boundary, so a capture split
/// into chunks is delivered to the consumer exactly as it arrived on the
/// original link.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    chunks: VecDeque<Vec<u8>>,
    current: Vec<u8>,
    offset: usize,
    closed: bool,
}

impl ReplayTransport {
    /// Create a replay transport from a sequence of captured chunks
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into(),
            current: Vec::new(),
            offset: 0,
            closed: false,
        }
    }

    /// Create a replay transport delivering the whole capture as one chunk
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(vec![bytes.to_vec()])
    }

    /// Append another chunk to the replay queue
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        self.chunks.push_back(chunk);
    }
}

#[async_trait]
impl TransportLayer for ReplayTransport {
    async fn open(&mut self) -> SmartyResult<()> {
        self.closed = false;
        Ok(())
    }
}

#[async_trait]
impl StreamAccessor for ReplayTransport {
    async fn set_timeout(&mut self, _timeout: Option<Duration>) -> SmartyResult<()> {
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> SmartyResult<usize> {
        if self.closed {
            return Err(SmartyError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Replay stream is closed",
            )));
        }

        while self.offset >= self.current.len() {
            match self.chunks.pop_front() {
                Some(chunk) => {
                    self.current = chunk;
                    self.offset = 0;
                }
                None => return Ok(0),
            }
        }

        let n = (self.current.len() - self.offset).min(buf.len());
        buf[..n].copy_from_slice(&self.current[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> SmartyResult<()> {
        self.closed = true;
        Ok(())
    }
}
