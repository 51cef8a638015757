//! Protocol constants shared between the framing and security layers

/// Length of the AES-GCM authentication tag carried at the end of each frame
pub const GCM_TAG_LENGTH: usize = 12;

/// Length of the frame counter field
pub const FRAME_COUNTER_LENGTH: usize = 4;

/// Length of the AES-GCM initial value (system title + frame counter)
pub const NONCE_LENGTH: usize = 12;

/// Length of the AES-128 encryption key in raw bytes
pub const KEY_LENGTH: usize = 16;
