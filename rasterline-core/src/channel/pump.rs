//! Scan-out side of the handoff
//!
//! Drives a `ScanoutSink` from the ready queue on the real-time context.
//! The pump never waits on the channel once output has started: a missing
//! row becomes a blank line.

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::RawMutex;

use super::scanline::ScanlineChannel;
use crate::config::TimingConfig;
use crate::traits::{BringUpError, ScanoutSink};

/// What happened on one output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineOutcome {
    /// A row was emitted and handed back
    Line {
        /// Row index within the frame
        index: usize,
        /// Row arrived in top-to-bottom order
        in_order: bool,
    },
    /// No row was ready
    Blank,
}

/// Scan-out counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanoutStats {
    /// Rows emitted
    pub lines: u64,
    /// Blank lines emitted while no row was ready
    pub blanks: u64,
    /// Rows that did not follow the previous row
    pub order_faults: u64,
    /// Rows the returned queue refused
    pub lost_rows: u64,
}

/// Consumer loop feeding a sink from a scanline channel
pub struct ScanoutPump<'c, 'a, M: RawMutex, S: ScanoutSink, const DEPTH: usize, const H: usize> {
    channel: &'c ScanlineChannel<'a, M, DEPTH, H>,
    sink: S,
    expected: usize,
    stats: ScanoutStats,
}

impl<'c, 'a, M, S, const DEPTH: usize, const H: usize> ScanoutPump<'c, 'a, M, S, DEPTH, H>
where
    M: RawMutex,
    S: ScanoutSink,
{
    /// Create a pump over a channel and a sink
    pub fn new(channel: &'c ScanlineChannel<'a, M, DEPTH, H>, sink: S) -> Self {
        Self {
            channel,
            sink,
            expected: 0,
            stats: ScanoutStats::default(),
        }
    }

    /// Bring the sink up for a raster standard
    pub fn start(&mut self, timing: &TimingConfig) -> Result<(), BringUpError> {
        self.sink.start(timing)
    }

    /// Counters so far
    pub fn stats(&self) -> ScanoutStats {
        self.stats
    }

    /// The wrapped sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Yield until the producer has published its first row
    pub async fn wait_for_first_row(&self) {
        while !self.channel.has_ready() {
            yield_now().await;
        }
    }

    /// Emit exactly one line
    ///
    /// Takes the next ready row if there is one, emits it and hands it back;
    /// otherwise emits a blank line.
    pub async fn service_line(&mut self) -> LineOutcome {
        let Some(row) = self.channel.consume() else {
            self.sink.emit_blank().await;
            self.stats.blanks += 1;
            return LineOutcome::Blank;
        };

        let index = row.index();
        let in_order = index == self.expected;
        if !in_order {
            self.stats.order_faults += 1;
        }
        self.expected = (index + 1) % H;

        self.sink.emit_line(row.pixels()).await;
        self.stats.lines += 1;

        if self.channel.return_row(row).is_err() {
            self.stats.lost_rows += 1;
        }

        LineOutcome::Line { index, in_order }
    }

    /// Run the scan-out loop forever
    ///
    /// Output starts with the first published row.
    pub async fn run(&mut self) -> ! {
        self.wait_for_first_row().await;
        loop {
            self.service_line().await;
        }
    }
}
