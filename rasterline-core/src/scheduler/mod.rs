//! Frame scheduling
//!
//! The pacer decides when a frame is due; the producer does the work of a
//! frame when it is.

pub mod pacer;
pub mod producer;

pub use pacer::{Deadline, FramePacer, ThroughputSample, INTERVAL_PATTERN_LEN};
pub use producer::{FrameProducer, FrameReport};
