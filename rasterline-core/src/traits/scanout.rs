//! Video sink trait
//!
//! Abstracts over whatever turns a row of RGB565 pixels into a line of
//! video (a PIO serialiser, a DMA engine, a test recorder).

use crate::config::{ConfigError, TimingConfig};
use crate::frame::RawPixel;

/// Errors raised while bringing the video output up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpError {
    /// The system clock could not be set to the requested frequency
    ClockRejected,
    /// The pixel clock cannot be derived from the system clock
    PixelClockUnreachable,
    /// Configuration failed validation
    InvalidConfig(ConfigError),
}

impl From<ConfigError> for BringUpError {
    fn from(err: ConfigError) -> Self {
        BringUpError::InvalidConfig(err)
    }
}

/// Real-time line output
///
/// Emitting a line completes once the sink no longer needs the pixels, so
/// the caller may hand the row back as soon as `emit_line` returns.
#[allow(async_fn_in_trait)]
pub trait ScanoutSink {
    /// Configure the output for a raster standard
    ///
    /// Called once before any line is emitted. Failure is fatal.
    fn start(&mut self, timing: &TimingConfig) -> Result<(), BringUpError>;

    /// Emit one line of pixels
    async fn emit_line(&mut self, pixels: &[RawPixel]);

    /// Emit a line while no row is ready
    async fn emit_blank(&mut self);
}
