//! Security constants for smarty telegrams

/// Length of the additional authenticated data in bytes
pub const AAD_LENGTH: usize = 17;

/// Additional authenticated data used by the meter
///
/// Hex `3000112233445566778899AABBCCDDEEFF`: the security control byte
/// (`0x30`) followed by the 16-byte default authentication key. The constant
/// is exactly 17 bytes.
pub const DEFAULT_AAD: [u8; AAD_LENGTH] = [
    0x30, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
    0xEE, 0xFF,
];

/// Length of the hex-encoded decryption key in characters
pub const KEY_HEX_LENGTH: usize = 32;
