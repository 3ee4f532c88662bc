//! 8x16 digit font
//!
//! The ten digit glyphs of the classic VGA 8x16 ROM font, packed into an
//! `embedded-graphics` mono font so they can be drawn with `Text`.

use embedded_graphics::geometry::Size;
use embedded_graphics::image::ImageRaw;
use embedded_graphics::mono_font::mapping::StrGlyphMapping;
use embedded_graphics::mono_font::{DecorationDimensions, MonoFont};

/// Glyph width in pixels
pub const GLYPH_WIDTH: u32 = 8;
/// Glyph height in pixels
pub const GLYPH_HEIGHT: u32 = 16;
/// Gap between glyphs
pub const GLYPH_SPACING: u32 = 1;
/// Horizontal distance between the starts of two glyphs
pub const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + GLYPH_SPACING;

const GLYPH_COUNT: usize = 10;
const FIRST_INKED_ROW: usize = 2;
const INKED_ROWS: usize = 10;

/// Rows 2..12 of each digit glyph; the other rows are blank
const DIGIT_ROWS: [[u8; INKED_ROWS]; GLYPH_COUNT] = [
    [0x7C, 0xC6, 0xC6, 0xCE, 0xDE, 0xF6, 0xE6, 0xC6, 0xC6, 0x7C],
    [0x18, 0x38, 0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x7E],
    [0x7C, 0xC6, 0x06, 0x0C, 0x18, 0x30, 0x60, 0xC0, 0xC6, 0xFE],
    [0x7C, 0xC6, 0x06, 0x06, 0x3C, 0x06, 0x06, 0x06, 0xC6, 0x7C],
    [0x0C, 0x1C, 0x3C, 0x6C, 0xCC, 0xFE, 0x0C, 0x0C, 0x0C, 0x1E],
    [0xFE, 0xC0, 0xC0, 0xC0, 0xFC, 0x06, 0x06, 0x06, 0xC6, 0x7C],
    [0x38, 0x60, 0xC0, 0xC0, 0xFC, 0xC6, 0xC6, 0xC6, 0xC6, 0x7C],
    [0xFE, 0xC6, 0x06, 0x06, 0x0C, 0x18, 0x30, 0x30, 0x30, 0x30],
    [0x7C, 0xC6, 0xC6, 0xC6, 0x7C, 0xC6, 0xC6, 0xC6, 0xC6, 0x7C],
    [0x7C, 0xC6, 0xC6, 0xC6, 0x7E, 0x06, 0x06, 0x06, 0x0C, 0x78],
];

const IMAGE_LEN: usize = GLYPH_COUNT * GLYPH_HEIGHT as usize;

/// Lay the glyphs side by side: image row `r` holds row `r` of every glyph
const fn interleave(glyphs: &[[u8; INKED_ROWS]; GLYPH_COUNT]) -> [u8; IMAGE_LEN] {
    let mut image = [0u8; IMAGE_LEN];
    let mut digit = 0;
    while digit < GLYPH_COUNT {
        let mut row = 0;
        while row < INKED_ROWS {
            image[(FIRST_INKED_ROW + row) * GLYPH_COUNT + digit] = glyphs[digit][row];
            row += 1;
        }
        digit += 1;
    }
    image
}

const DIGIT_IMAGE: [u8; IMAGE_LEN] = interleave(&DIGIT_ROWS);

const DIGIT_MAPPING: StrGlyphMapping<'static> = StrGlyphMapping::new("0123456789", 0);

/// Digits `0`-`9` only; any other character renders as `0`
pub const DIGITS_8X16: MonoFont<'static> = MonoFont {
    image: ImageRaw::new(&DIGIT_IMAGE, GLYPH_WIDTH * GLYPH_COUNT as u32),
    glyph_mapping: &DIGIT_MAPPING,
    character_size: Size::new(GLYPH_WIDTH, GLYPH_HEIGHT),
    character_spacing: GLYPH_SPACING,
    baseline: 12,
    underline: DecorationDimensions::default_underline(GLYPH_HEIGHT),
    strikethrough: DecorationDimensions::default_strikethrough(GLYPH_HEIGHT),
};

/// Raw bitmap row of a digit glyph (bit 7 = leftmost pixel)
pub fn glyph_row(digit: u8, row: usize) -> u8 {
    if digit as usize >= GLYPH_COUNT || row >= GLYPH_HEIGHT as usize {
        return 0;
    }
    DIGIT_IMAGE[row * GLYPH_COUNT + digit as usize]
}
