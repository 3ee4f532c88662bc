//! Drawing access to a complete frame

use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::buffer::RawPixel;

/// Mutable view of a frame whose rows are all home
///
/// Every write is bounds checked; writes that fall outside the frame are
/// dropped rather than reported, so a content generator with a bad
/// coordinate loses that draw and nothing else.
pub struct FrameView<'v, 'a> {
    width: usize,
    rows: &'v mut [Option<&'a mut [RawPixel]>],
}

impl<'v, 'a> FrameView<'v, 'a> {
    pub(crate) fn new(width: usize, rows: &'v mut [Option<&'a mut [RawPixel]>]) -> Self {
        Self { width, rows }
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Mutable access to one row
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [RawPixel]> {
        self.rows.get_mut(y)?.as_deref_mut()
    }

    /// Read one pixel
    pub fn get(&self, x: usize, y: usize) -> Option<RawPixel> {
        self.rows.get(y)?.as_ref()?.get(x).copied()
    }

    /// Write one pixel
    ///
    /// Returns false if the position is outside the frame.
    pub fn set(&mut self, x: usize, y: usize, pixel: RawPixel) -> bool {
        match self.row_mut(y).and_then(|row| row.get_mut(x)) {
            Some(slot) => {
                *slot = pixel;
                true
            }
            None => false,
        }
    }

    /// Fill the whole frame
    pub fn fill(&mut self, pixel: RawPixel) {
        for row in self.rows.iter_mut().flatten() {
            row.fill(pixel);
        }
    }

    /// Fill a rectangle, clipped to the frame
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, pixel: RawPixel) {
        let area = Rectangle::new(Point::new(x, y), Size::new(width, height));
        self.fill_area(&area, pixel);
    }

    fn fill_area(&mut self, area: &Rectangle, pixel: RawPixel) {
        let clipped = area.intersection(&self.bounding_box());
        let Some(bottom_right) = clipped.bottom_right() else {
            return;
        };

        let x0 = clipped.top_left.x as usize;
        let x1 = bottom_right.x as usize + 1;
        for y in clipped.top_left.y as usize..=bottom_right.y as usize {
            if let Some(row) = self.row_mut(y) {
                row[x0..x1].fill(pixel);
            }
        }
    }
}

impl OriginDimensions for FrameView<'_, '_> {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.rows.len() as u32)
    }
}

impl DrawTarget for FrameView<'_, '_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.set(x as usize, y as usize, color.into_storage());
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_area(area, color.into_storage());
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.into_storage());
        Ok(())
    }
}

/// Convert a packed RGB565 value into an `embedded-graphics` colour
pub fn rgb565(raw: RawPixel) -> Rgb565 {
    Rgb565::from(RawU16::new(raw))
}
