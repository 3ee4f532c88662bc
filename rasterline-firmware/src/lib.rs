//! Rasterline firmware support
//!
//! Board bring-up, the PIO scan-out sink and the two-core pipeline wiring
//! shared by the firmware binaries.

#![no_std]

pub mod board;
pub mod channels;
pub mod clock;
pub mod config;
pub mod pipeline;
pub mod scanout;
