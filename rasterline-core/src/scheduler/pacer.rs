//! Fractional-rate frame pacer
//!
//! A 60 Hz frame period is 16666.67 µs, which a microsecond clock cannot
//! hold. The pacer advances its deadline by a repeating short/long/long
//! pattern of whole-microsecond intervals instead, so the rounding error is
//! at most one microsecond and cancels every cycle.
//!
//! Deadlines are advanced from the previous deadline, never from the time
//! a poll happened to notice it, so late polls do not accumulate drift.

use crate::config::PacerConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of intervals in one pacing cycle
pub const INTERVAL_PATTERN_LEN: u8 = 3;

/// Result of polling the pacer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Deadline {
    /// The deadline has passed and has been advanced to the next frame
    Due,
    /// The deadline is still ahead
    Pending {
        /// Microseconds until the deadline
        remaining_us: u64,
    },
}

impl Deadline {
    /// Check whether a frame should be produced now
    pub fn is_due(&self) -> bool {
        matches!(self, Deadline::Due)
    }

    /// How long to wait before polling again
    ///
    /// Half the remaining time, so the deadline is approached in shrinking
    /// steps and overshoot stays small.
    pub fn wait_hint(&self) -> u64 {
        match self {
            Deadline::Due => 0,
            Deadline::Pending { remaining_us } => remaining_us / 2,
        }
    }
}

/// Diagnostic throughput measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThroughputSample {
    /// Frames produced since the previous sample
    pub frames: u32,
    /// Wall time those frames took (µs)
    pub elapsed_us: u64,
}

/// Frame deadline schedule
#[derive(Debug, Clone)]
pub struct FramePacer {
    short_us: u64,
    long_us: u64,
    sample_every: u32,
    /// Next frame deadline (µs)
    deadline_us: u64,
    /// Position in the short/long/long pattern of the next interval
    phase: u8,
    frames_since_sample: u32,
    last_sample_us: u64,
}

impl FramePacer {
    /// Create a pacer; it does nothing useful until `start` is called
    pub fn new(config: &PacerConfig) -> Self {
        Self {
            short_us: config.short_interval_us as u64,
            long_us: config.long_interval_us as u64,
            sample_every: config.sample_every,
            deadline_us: 0,
            phase: 0,
            frames_since_sample: 0,
            last_sample_us: 0,
        }
    }

    /// Anchor the schedule to the first clock sample
    ///
    /// The first frame is due one short interval after `now_us`.
    pub fn start(&mut self, now_us: u64) {
        self.phase = 0;
        self.deadline_us = now_us;
        self.advance();
        self.frames_since_sample = 0;
        self.last_sample_us = now_us;
    }

    /// Current deadline (µs)
    pub fn deadline_us(&self) -> u64 {
        self.deadline_us
    }

    /// Length of interval `k` of the schedule
    pub fn interval_us(&self, k: u64) -> u64 {
        if k % INTERVAL_PATTERN_LEN as u64 == 0 {
            self.short_us
        } else {
            self.long_us
        }
    }

    /// Poll the schedule
    ///
    /// Fires once `now_us` is strictly past the deadline, advancing the
    /// deadline by the next interval of the pattern.
    pub fn next_deadline(&mut self, now_us: u64) -> Deadline {
        if now_us > self.deadline_us {
            self.advance();
            Deadline::Due
        } else {
            Deadline::Pending {
                remaining_us: self.deadline_us - now_us,
            }
        }
    }

    /// Count a produced frame
    ///
    /// Returns a sample every `sample_every` frames.
    pub fn record_frame(&mut self, now_us: u64) -> Option<ThroughputSample> {
        if self.sample_every == 0 {
            return None;
        }

        self.frames_since_sample += 1;
        if self.frames_since_sample < self.sample_every {
            return None;
        }

        let sample = ThroughputSample {
            frames: self.frames_since_sample,
            elapsed_us: now_us.saturating_sub(self.last_sample_us),
        };
        self.frames_since_sample = 0;
        self.last_sample_us = now_us;
        Some(sample)
    }

    fn advance(&mut self) {
        self.deadline_us += self.interval_us(self.phase as u64);
        self.phase = (self.phase + 1) % INTERVAL_PATTERN_LEN;
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(&PacerConfig::default())
    }
}
