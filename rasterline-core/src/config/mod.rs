//! Configuration types
//!
//! Plain configuration structures with defaults matching a 320x240 frame
//! scanned out at 640x480p60. The firmware fills them from compile-time
//! constants generated out of `display.toml`.

pub mod types;

pub use types::*;
