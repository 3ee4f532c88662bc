//! Configuration type definitions

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum raster standard label length
pub const MAX_LABEL_LEN: usize = 16;

/// PIO instructions spent per pixel by the scan-out program
pub const SCANOUT_CYCLES_PER_PIXEL: u32 = 2;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    ZeroDimension,
    /// Ready queue depth is zero or larger than the frame height
    DepthOutOfRange,
    /// Pacer intervals are zero or the short interval exceeds the long one
    IntervalOrder,
    /// Counter restart value is not below the ceiling
    CounterRange,
    /// A named content parameter is out of range
    InvalidValue(&'static str),
}

/// Raster timing of the video sink
///
/// Opaque to the pipeline: it is handed to the scan-out sink unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Raster standard name (e.g. "640x480p60")
    pub label: String<MAX_LABEL_LEN>,
    /// Output pixel clock in kHz
    pub pixel_clock_khz: u32,
    /// Serial bit clock in kHz (the system clock is run at this rate)
    pub bit_clock_khz: u32,
    /// Active pixels per output line
    pub h_active: u16,
    /// Active output lines per frame
    pub v_active: u16,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let mut label = String::new();
        let _ = label.push_str("640x480p60");
        Self {
            label,
            pixel_clock_khz: 25_200,
            bit_clock_khz: 252_000,
            h_active: 640,
            v_active: 480,
        }
    }
}

impl TimingConfig {
    /// System clock frequency required by this timing in Hz
    pub fn system_clock_hz(&self) -> u32 {
        self.bit_clock_khz.saturating_mul(1000)
    }

    /// Clock divider (×256, i.e. 24.8 fixed point) for the scan-out state machine
    ///
    /// A frame narrower than the raster is stretched horizontally, so each
    /// frame pixel is held for `h_active / frame_width` output pixels.
    ///
    /// Returns `None` when the resulting divider is below 1.0 or does not fit.
    pub fn scanout_divider_x256(&self, sys_clk_hz: u32, frame_width: u16) -> Option<u32> {
        if self.h_active == 0 || frame_width == 0 {
            return None;
        }

        let frame_pixel_hz =
            (self.pixel_clock_khz as u64 * 1000) * frame_width as u64 / self.h_active as u64;
        let divisor = frame_pixel_hz * SCANOUT_CYCLES_PER_PIXEL as u64;
        if divisor == 0 {
            return None;
        }

        let divider_x256 = (sys_clk_hz as u64 * 256) / divisor;
        if divider_x256 < 256 || divider_x256 > u32::MAX as u64 {
            return None;
        }

        Some(divider_x256 as u32)
    }
}

/// Frame pacing configuration
///
/// Two integer-microsecond intervals approximate a fractional frame period:
/// one short interval followed by two long ones. 16666/16667/16667 averages
/// to exactly 60.00 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PacerConfig {
    /// Short frame interval (µs), used once per 3-frame cycle
    pub short_interval_us: u32,
    /// Long frame interval (µs), used twice per 3-frame cycle
    pub long_interval_us: u32,
    /// Emit a throughput sample every N produced frames (0 = never)
    pub sample_every: u32,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            short_interval_us: 16_666,
            long_interval_us: 16_667,
            sample_every: 300,
        }
    }
}

impl PacerConfig {
    /// Total length of one short/long/long cycle in µs
    pub fn cycle_us(&self) -> u64 {
        self.short_interval_us as u64 + 2 * self.long_interval_us as u64
    }

    /// Validate the interval pair
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_interval_us == 0 || self.short_interval_us > self.long_interval_us {
            return Err(ConfigError::IntervalOrder);
        }
        Ok(())
    }
}

/// Frame counter wrap configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CounterConfig {
    /// Value at which the counter wraps (never held by the counter)
    pub ceiling: u32,
    /// Value the counter restarts from, and starts at
    pub restart: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            ceiling: 99_999,
            restart: 0,
        }
    }
}

impl CounterConfig {
    /// Validate the wrap range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.restart >= self.ceiling {
            return Err(ConfigError::CounterRange);
        }
        Ok(())
    }
}

/// Frame geometry and handoff depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameConfig {
    /// Frame width in pixels
    pub width: u16,
    /// Frame height in rows
    pub height: u16,
    /// Capacity of the ready queue (rows published but not yet consumed)
    pub ready_depth: u16,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            ready_depth: 240,
        }
    }
}

impl FrameConfig {
    /// Validate geometry and depth
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.ready_depth == 0 || self.ready_depth > self.height {
            return Err(ConfigError::DepthOutOfRange);
        }
        Ok(())
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// Frame geometry
    pub frame: FrameConfig,
    /// Raster timing passed through to the sink
    pub timing: TimingConfig,
    /// Frame pacing
    pub pacer: PacerConfig,
    /// Frame counter wrap
    pub counter: CounterConfig,
}

impl PipelineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.frame.validate()?;
        self.pacer.validate()?;
        self.counter.validate()?;
        Ok(())
    }
}
