//! Scanline handoff between the producer and the scan-out context
//!
//! Two bounded FIFOs of row references: rows the producer has finished
//! drawing travel down the ready queue, rows the sink has finished reading
//! travel back up the returned queue.

pub mod pump;
pub mod scanline;

pub use pump::{LineOutcome, ScanoutPump, ScanoutStats};
pub use scanline::ScanlineChannel;
