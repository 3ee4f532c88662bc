//! RGB565 colours used by the generators

use rasterline_core::RawPixel;

pub const BLACK: RawPixel = 0x0000;
pub const WHITE: RawPixel = 0xFFFF;

/// Snake game border ring
pub const BORDER: RawPixel = 0x3bbb;
/// Snake game playfield
pub const BACKGROUND: RawPixel = 0x9f53;
pub const SNAKE: RawPixel = 0x1ca3;
pub const FOOD: RawPixel = 0xfaca;
