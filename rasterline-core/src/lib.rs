//! Board-agnostic core of the scanline video pipeline
//!
//! This crate contains everything between "a content generator drew a frame"
//! and "the scan-out context emitted a line", with no dependency on a
//! particular chip:
//!
//! - Frame storage and the row ownership contract (`frame`)
//! - The bounded scanline handoff between the two contexts (`channel`)
//! - Frame pacing against a fractional target rate (`scheduler`)
//! - The producer state machine (`state`)
//! - Configuration types (`config`)
//! - Hardware boundary traits (`traits`)

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod frame;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use channel::{LineOutcome, ScanlineChannel, ScanoutPump, ScanoutStats};
pub use frame::{FrameBuffer, FrameCounter, FrameStorage, FrameView, RawPixel, ScanlineRef};
pub use scheduler::{Deadline, FramePacer, FrameProducer, FrameReport, ThroughputSample};
pub use state::{ProducerEvent, ProducerState};
pub use traits::{BringUpError, Clock, ContentGenerator, FrameContext, ScanoutSink};
