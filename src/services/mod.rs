//! External service module
//!
//! This module contains the playback backends that connect to radio streams.

pub mod playback;

// Re-export main types
pub use playback::*;
