//! Core types and utilities for the smarty telegram reader
//!
//! This crate provides the error taxonomy and shared protocol constants
//! used throughout the smarty implementation.

pub mod constants;
pub mod error;

pub use constants::{FRAME_COUNTER_LENGTH, GCM_TAG_LENGTH, KEY_LENGTH, NONCE_LENGTH};
pub use error::{SmartyError, SmartyResult};
