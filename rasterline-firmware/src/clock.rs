//! Pacing clock backed by the embassy time driver

use embassy_time::{block_for, Duration, Instant};
use rasterline_core::Clock;

/// Microsecond clock on the RP2040 timer
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }

    fn busy_wait_us(&self, us: u64) {
        block_for(Duration::from_micros(us));
    }
}
