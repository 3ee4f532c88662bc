//! Centred frame counter display

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use rasterline_core::config::ConfigError;
use rasterline_core::frame::rgb565;
use rasterline_core::{ContentGenerator, FrameContext, FrameView, RawPixel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::font::{DIGITS_8X16, GLYPH_ADVANCE, GLYPH_HEIGHT};
use crate::palette;

/// Decimal digits in the largest `u32`
const MAX_FORMATTED_LEN: usize = 10;

/// Digit counter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DigitCounterConfig {
    /// Longest number drawn; longer ones are skipped
    pub max_digits: u8,
    /// Digit colour
    pub foreground: RawPixel,
    /// Background colour behind the digits and for full clears
    pub background: RawPixel,
}

impl Default for DigitCounterConfig {
    fn default() -> Self {
        Self {
            max_digits: 5,
            foreground: palette::WHITE,
            background: palette::BLACK,
        }
    }
}

impl DigitCounterConfig {
    /// Check that the widest number fits a frame of `width` pixels
    pub fn validate(&self, width: u16) -> Result<(), ConfigError> {
        if self.max_digits == 0 || self.max_digits as usize > MAX_FORMATTED_LEN {
            return Err(ConfigError::InvalidValue("max_digits"));
        }
        if self.max_digits as u32 * GLYPH_ADVANCE > width as u32 {
            return Err(ConfigError::InvalidValue("max_digits"));
        }
        Ok(())
    }
}

/// Draws the frame index, centred, in an 8x16 font
#[derive(Debug, Clone, Default)]
pub struct DigitCounter {
    config: DigitCounterConfig,
    skipped: u32,
}

impl DigitCounter {
    pub fn new(config: DigitCounterConfig) -> Self {
        Self { config, skipped: 0 }
    }

    pub fn config(&self) -> &DigitCounterConfig {
        &self.config
    }

    /// Frames whose number was too long to draw
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Top-left corner of the digit strip for an `n`-digit number
    pub fn strip_origin(width: usize, height: usize, digits: usize) -> Point {
        let strip_width = (digits as u32 * GLYPH_ADVANCE) as i32;
        Point::new(
            (width as i32 - strip_width) / 2,
            (height as i32 - GLYPH_HEIGHT as i32) / 2,
        )
    }
}

impl ContentGenerator for DigitCounter {
    fn render(&mut self, frame: FrameContext, view: &mut FrameView<'_, '_>) {
        if frame.clear_requested {
            view.fill(self.config.background);
        }

        let mut text: String<MAX_FORMATTED_LEN> = String::new();
        if write!(text, "{}", frame.index).is_err() || text.len() > self.config.max_digits as usize
        {
            self.skipped += 1;
            return;
        }

        let origin = Self::strip_origin(view.width(), view.height(), text.len());
        view.fill_rect(
            origin.x,
            origin.y,
            text.len() as u32 * GLYPH_ADVANCE,
            GLYPH_HEIGHT,
            self.config.background,
        );

        let style = MonoTextStyleBuilder::new()
            .font(&DIGITS_8X16)
            .text_color(rgb565(self.config.foreground))
            .background_color(rgb565(self.config.background))
            .build();
        let _ = Text::with_baseline(&text, origin, style, Baseline::Top).draw(view);
    }
}
