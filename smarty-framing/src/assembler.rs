//! Telegram frame assembler
//!
//! A state machine consuming the raw byte stream one byte at a time and
//! signalling when a complete, well-formed frame has been read. Malformed
//! frames are dropped and the assembler resynchronizes on the next start
//! marker anywhere later in the stream.

use crate::error::{SmartyError, SmartyResult};
use crate::telegram::{
    Telegram, DECLARED_LENGTH_OVERHEAD, SEPARATOR_FRAME_COUNTER, SEPARATOR_PAYLOAD_LENGTH,
    START_BYTE,
};
use smarty_core::{FRAME_COUNTER_LENGTH, GCM_TAG_LENGTH};

/// Assembler state
///
/// States progress linearly while a frame is being read; any structural
/// violation returns to `WaitStart` without delivering the frame.
///
/// ```text
/// WaitStart -> ReadSystemTitleLength -> ReadSystemTitle -> ReadSeparator82
///   -> ReadPayloadLength -> ReadSeparator30 -> ReadFrameCounter
///   -> ReadPayload -> ReadGcmTag -> Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// Discarding bytes until the start marker is observed
    WaitStart,
    /// The next byte carries the system title length
    ReadSystemTitleLength,
    /// Accumulating the system title
    ReadSystemTitle,
    /// Expecting the `0x82` separator
    ReadSeparator82,
    /// Accumulating the two-byte big-endian declared length
    ReadPayloadLength,
    /// Expecting the `0x30` separator
    ReadSeparator30,
    /// Accumulating the four-byte frame counter
    ReadFrameCounter,
    /// Accumulating the ciphertext payload
    ReadPayload,
    /// Accumulating the GCM authentication tag
    ReadGcmTag,
    /// Frame complete; reset to `WaitStart` within the same `feed` call
    Done,
}

impl Default for AssemblerState {
    fn default() -> Self {
        AssemblerState::WaitStart
    }
}

/// Telegram frame assembler
///
/// Owns the accumulation buffers of the in-flight telegram. Each parsing
/// context (one per connection) owns its assembler exclusively; the scratch
/// state is never shared between readers.
#[derive(Debug, Default)]
pub struct TelegramAssembler {
    state: AssemblerState,
    position: usize,
    next_state_at: usize,
    telegram: Telegram,
}

impl TelegramAssembler {
    /// Create a new assembler waiting for a start marker
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Feed one byte from the stream
    ///
    /// Returns `true` for exactly the invocation that completes a frame; the
    /// completed telegram is then available through [`take_telegram`].
    /// Chunk boundaries carry no meaning — state persists across calls.
    ///
    /// [`take_telegram`]: TelegramAssembler::take_telegram
    pub fn feed(&mut self, byte: u8) -> bool {
        self.position += 1;

        match self.state {
            AssemblerState::WaitStart => {
                if byte == START_BYTE {
                    self.reset();
                    self.state = AssemblerState::ReadSystemTitleLength;
                }
            }
            AssemblerState::ReadSystemTitleLength => {
                // Start byte at position 0, length byte at position 1
                self.next_state_at = 1 + byte as usize;
                if byte == 0 {
                    self.state = AssemblerState::ReadSeparator82;
                    self.next_state_at += 1;
                } else {
                    self.state = AssemblerState::ReadSystemTitle;
                }
            }
            AssemblerState::ReadSystemTitle => {
                self.telegram.system_title.push(byte);
                if self.position >= self.next_state_at {
                    self.state = AssemblerState::ReadSeparator82;
                    self.next_state_at += 1;
                }
            }
            AssemblerState::ReadSeparator82 => {
                if byte == SEPARATOR_PAYLOAD_LENGTH {
                    // Separator byte itself is not stored
                    self.state = AssemblerState::ReadPayloadLength;
                    self.next_state_at += 2;
                } else {
                    log::warn!("Missing separator (0x82). Dropping telegram.");
                    self.state = AssemblerState::WaitStart;
                }
            }
            AssemblerState::ReadPayloadLength => {
                self.telegram.declared_length =
                    (self.telegram.declared_length << 8) | byte as usize;
                if self.position >= self.next_state_at {
                    self.state = AssemblerState::ReadSeparator30;
                    self.next_state_at += 1;
                }
            }
            AssemblerState::ReadSeparator30 => {
                if byte != SEPARATOR_FRAME_COUNTER {
                    log::warn!("Missing separator (0x30). Dropping telegram.");
                    self.state = AssemblerState::WaitStart;
                } else if self.telegram.declared_length < DECLARED_LENGTH_OVERHEAD {
                    log::warn!(
                        "Declared length {} below protocol overhead. Dropping telegram.",
                        self.telegram.declared_length
                    );
                    self.state = AssemblerState::WaitStart;
                } else {
                    self.state = AssemblerState::ReadFrameCounter;
                    self.next_state_at += FRAME_COUNTER_LENGTH;
                }
            }
            AssemblerState::ReadFrameCounter => {
                self.telegram.frame_counter.push(byte);
                if self.position >= self.next_state_at {
                    let payload_length =
                        self.telegram.declared_length - DECLARED_LENGTH_OVERHEAD;
                    self.next_state_at += payload_length;
                    if payload_length == 0 {
                        self.state = AssemblerState::ReadGcmTag;
                        self.next_state_at += GCM_TAG_LENGTH;
                    } else {
                        self.state = AssemblerState::ReadPayload;
                    }
                }
            }
            AssemblerState::ReadPayload => {
                self.telegram.payload.push(byte);
                if self.position >= self.next_state_at {
                    self.state = AssemblerState::ReadGcmTag;
                    self.next_state_at += GCM_TAG_LENGTH;
                }
            }
            AssemblerState::ReadGcmTag => {
                self.telegram.gcm_tag.push(byte);
                if self.position >= self.next_state_at {
                    self.state = AssemblerState::Done;
                }
            }
            AssemblerState::Done => {}
        }

        if self.state == AssemblerState::Done {
            self.state = AssemblerState::WaitStart;
            return true;
        }
        false
    }

    /// Take the completed telegram out of the assembler
    ///
    /// Valid after [`feed`] returned `true`. The buffers stay untouched until
    /// the next start marker begins a new frame.
    ///
    /// [`feed`]: TelegramAssembler::feed
    pub fn take_telegram(&mut self) -> Telegram {
        std::mem::take(&mut self.telegram)
    }

    fn reset(&mut self) {
        self.position = 0;
        self.next_state_at = 0;
        self.telegram = Telegram::default();
    }
}

/// Assemble a single telegram from an in-memory byte slice
///
/// Convenience for processing captured material without a byte source.
/// Returns the first complete frame found in `input`.
pub fn assemble_from_slice(input: &[u8]) -> SmartyResult<Telegram> {
    let mut assembler = TelegramAssembler::new();
    for &byte in input {
        if assembler.feed(byte) {
            return Ok(assembler.take_telegram());
        }
    }
    Err(SmartyError::FrameInvalid(
        "No complete telegram in input".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_frame(title: &[u8], counter: &[u8], payload: &[u8], tag: &[u8]) -> Vec<u8> {
        Telegram::new(title.to_vec(), counter.to_vec(), payload.to_vec(), tag.to_vec())
            .unwrap()
            .encode()
    }

    fn sample_frame() -> Vec<u8> {
        build_frame(
            b"SYSTITLE",
            &[0x00, 0x00, 0x00, 0x2A],
            &[0xDE, 0xAD, 0xBE, 0xEF, 0x42],
            &[0x7F; 12],
        )
    }

    fn feed_all(assembler: &mut TelegramAssembler, bytes: &[u8]) -> Vec<Telegram> {
        let mut telegrams = Vec::new();
        for &byte in bytes {
            if assembler.feed(byte) {
                telegrams.push(assembler.take_telegram());
            }
        }
        telegrams
    }

    #[test]
    fn test_assembles_single_frame() {
        let frame = sample_frame();
        let mut assembler = TelegramAssembler::new();

        for (i, &byte) in frame.iter().enumerate() {
            let ready = assembler.feed(byte);
            assert_eq!(ready, i == frame.len() - 1, "ready at byte {}", i);
        }

        let telegram = assembler.take_telegram();
        assert_eq!(telegram.system_title(), b"SYSTITLE");
        assert_eq!(telegram.frame_counter(), &[0x00, 0x00, 0x00, 0x2A]);
        assert_eq!(telegram.payload(), &[0xDE, 0xAD, 0xBE, 0xEF, 0x42]);
        assert_eq!(telegram.gcm_tag(), &[0x7F; 12]);
        assert_eq!(telegram.declared_length(), 5 + DECLARED_LENGTH_OVERHEAD);
        assert_eq!(assembler.state(), AssemblerState::WaitStart);
    }

    #[test]
    fn test_chunk_boundaries_carry_no_meaning() {
        let frame = sample_frame();
        let whole = assemble_from_slice(&frame).unwrap();

        for split in 1..frame.len() {
            let mut assembler = TelegramAssembler::new();
            let mut telegrams = feed_all(&mut assembler, &frame[..split]);
            telegrams.extend(feed_all(&mut assembler, &frame[split..]));
            assert_eq!(telegrams.len(), 1, "split at {}", split);
            assert_eq!(telegrams[0], whole, "split at {}", split);
        }
    }

    #[test]
    fn test_skips_garbage_before_start() {
        let mut stream = vec![0x00, 0xFF, 0x13, 0x37];
        stream.extend_from_slice(&sample_frame());

        let telegram = assemble_from_slice(&stream).unwrap();
        assert_eq!(telegram.system_title(), b"SYSTITLE");
    }

    #[test]
    fn test_resynchronizes_after_bad_separator_82() {
        // Valid start and title, then 0x83 where 0x82 is required
        let mut stream = vec![START_BYTE, 0x02, 0x41, 0x42, 0x83];
        stream.extend_from_slice(&sample_frame());

        let mut assembler = TelegramAssembler::new();
        let telegrams = feed_all(&mut assembler, &stream);

        assert_eq!(telegrams.len(), 1);
        assert_eq!(telegrams[0].system_title(), b"SYSTITLE");
        assert_eq!(telegrams[0].payload(), &[0xDE, 0xAD, 0xBE, 0xEF, 0x42]);
    }

    #[test]
    fn test_resynchronizes_after_bad_separator_30() {
        let mut stream = vec![
            START_BYTE, 0x02, 0x41, 0x42, // start, title
            SEPARATOR_PAYLOAD_LENGTH, 0x00, 0x14, // declared length 20
            0x31, // wrong separator
        ];
        stream.extend_from_slice(&sample_frame());

        let mut assembler = TelegramAssembler::new();
        let telegrams = feed_all(&mut assembler, &stream);

        assert_eq!(telegrams.len(), 1);
        assert_eq!(telegrams[0].system_title(), b"SYSTITLE");
    }

    #[test]
    fn test_declared_length_below_overhead_drops_frame() {
        let mut stream = vec![
            START_BYTE, 0x02, 0x41, 0x42,
            SEPARATOR_PAYLOAD_LENGTH, 0x00, 0x10, // declared length 16 < 17
            SEPARATOR_FRAME_COUNTER,
        ];
        stream.extend_from_slice(&sample_frame());

        let mut assembler = TelegramAssembler::new();
        let telegrams = feed_all(&mut assembler, &stream);

        assert_eq!(telegrams.len(), 1);
        assert_eq!(telegrams[0].system_title(), b"SYSTITLE");
    }

    #[test]
    fn test_back_to_back_frames_do_not_cross_contaminate() {
        let first = build_frame(
            b"METER001",
            &[0x00, 0x00, 0x00, 0x01],
            &[0x11, 0x22],
            &[0xA0; 12],
        );
        let second = build_frame(
            b"METER002",
            &[0x00, 0x00, 0x00, 0x02],
            &[0x33, 0x44, 0x55],
            &[0xB0; 12],
        );
        let mut stream = first;
        stream.extend_from_slice(&second);

        let mut assembler = TelegramAssembler::new();
        let telegrams = feed_all(&mut assembler, &stream);

        assert_eq!(telegrams.len(), 2);
        assert_eq!(telegrams[0].system_title(), b"METER001");
        assert_eq!(telegrams[0].payload(), &[0x11, 0x22]);
        assert_eq!(telegrams[1].system_title(), b"METER002");
        assert_eq!(telegrams[1].payload(), &[0x33, 0x44, 0x55]);
        assert_eq!(telegrams[1].frame_counter(), &[0x00, 0x00, 0x00, 0x02]);
    }

    #[test]
    fn test_aborted_frame_does_not_leak_into_next() {
        // Aborted attempt leaves its partial title behind; the next start
        // marker must clear it.
        let mut stream = vec![START_BYTE, 0x03, 0x58, 0x59, 0x5A, 0x00];
        stream.extend_from_slice(&sample_frame());

        let mut assembler = TelegramAssembler::new();
        let telegrams = feed_all(&mut assembler, &stream);

        assert_eq!(telegrams.len(), 1);
        assert_eq!(telegrams[0].system_title(), b"SYSTITLE");
        assert_eq!(telegrams[0].gcm_tag(), &[0x7F; 12]);
    }

    #[test]
    fn test_start_byte_inside_payload_is_data() {
        let frame = build_frame(
            b"SYSTITLE",
            &[0x00, 0x00, 0x00, 0x07],
            &[START_BYTE, START_BYTE, 0x01],
            &[0x55; 12],
        );

        let telegram = assemble_from_slice(&frame).unwrap();
        assert_eq!(telegram.payload(), &[START_BYTE, START_BYTE, 0x01]);
    }

    #[test]
    fn test_empty_payload_frame() {
        let frame = build_frame(b"SYSTITLE", &[0x00, 0x00, 0x00, 0x09], &[], &[0x66; 12]);

        let telegram = assemble_from_slice(&frame).unwrap();
        assert!(telegram.payload().is_empty());
        assert_eq!(telegram.declared_length(), DECLARED_LENGTH_OVERHEAD);
        assert_eq!(telegram.gcm_tag(), &[0x66; 12]);
    }

    #[test]
    fn test_incomplete_input_yields_nothing() {
        let frame = sample_frame();
        let result = assemble_from_slice(&frame[..frame.len() - 1]);
        assert!(result.is_err());
    }
}
