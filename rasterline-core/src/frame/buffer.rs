//! Frame storage and scanline references

use core::fmt;

use super::view::FrameView;

/// Packed RGB565 pixel as sent to the sink
pub type RawPixel = u16;

/// Statically sized pixel storage for one frame
///
/// Allocated once (normally in a static cell) and borrowed for the whole
/// program lifetime by a `FrameBuffer`.
pub struct FrameStorage<const W: usize, const H: usize> {
    rows: [[RawPixel; W]; H],
}

impl<const W: usize, const H: usize> FrameStorage<W, H> {
    /// Create storage filled with black
    pub const fn new() -> Self {
        Self::filled(0)
    }

    /// Create storage filled with one pixel value
    pub const fn filled(pixel: RawPixel) -> Self {
        Self {
            rows: [[pixel; W]; H],
        }
    }
}

impl<const W: usize, const H: usize> Default for FrameStorage<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Temporary read capability for one row of the frame
///
/// Holding a `ScanlineRef` is holding the row: the frame buffer cannot draw
/// into it until the reference is restored. Only the pixel contents can be
/// read from outside this crate.
pub struct ScanlineRef<'a> {
    index: u16,
    pixels: &'a mut [RawPixel],
}

impl<'a> ScanlineRef<'a> {
    /// Row index within the frame (0 = top)
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Row pixels, left to right
    pub fn pixels(&self) -> &[RawPixel] {
        self.pixels
    }

    /// Row length in pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Check for a zero-width row
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl fmt::Debug for ScanlineRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanlineRef")
            .field("index", &self.index)
            .field("len", &self.pixels.len())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ScanlineRef<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "ScanlineRef {{ index: {}, len: {} }}",
            self.index,
            self.pixels.len()
        );
    }
}

/// Producer-side owner of the frame rows
///
/// `H` is the frame height; the width is taken from the storage.
pub struct FrameBuffer<'a, const H: usize> {
    width: usize,
    rows: [Option<&'a mut [RawPixel]>; H],
}

impl<'a, const H: usize> FrameBuffer<'a, H> {
    /// Take ownership of every row in `storage`
    pub fn new<const W: usize>(storage: &'a mut FrameStorage<W, H>) -> Self {
        let mut rows = storage.rows.iter_mut();
        Self {
            width: W,
            rows: core::array::from_fn(|_| rows.next().map(|row| row.as_mut_slice())),
        }
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in rows
    pub fn height(&self) -> usize {
        H
    }

    /// Number of rows currently held by the buffer
    pub fn rows_home(&self) -> usize {
        self.rows.iter().filter(|row| row.is_some()).count()
    }

    /// Number of rows currently lent out
    pub fn rows_lent(&self) -> usize {
        H - self.rows_home()
    }

    /// Check whether every row is home
    pub fn is_complete(&self) -> bool {
        self.rows.iter().all(Option::is_some)
    }

    /// Check whether a particular row is home
    pub fn is_home(&self, index: usize) -> bool {
        matches!(self.rows.get(index), Some(Some(_)))
    }

    /// Lend a row out
    ///
    /// Returns `None` if the index is out of range or the row is already lent.
    pub fn take_row(&mut self, index: usize) -> Option<ScanlineRef<'a>> {
        let pixels = self.rows.get_mut(index)?.take()?;
        Some(ScanlineRef {
            index: index as u16,
            pixels,
        })
    }

    /// Put a lent row back
    ///
    /// A row that does not belong in an empty slot of this buffer (wrong
    /// index, wrong width, or its slot already occupied) is handed back.
    pub fn restore(&mut self, row: ScanlineRef<'a>) -> Result<(), ScanlineRef<'a>> {
        if row.pixels.len() != self.width {
            return Err(row);
        }
        let slot = match self.rows.get_mut(row.index as usize) {
            Some(slot) if slot.is_none() => slot,
            _ => return Err(row),
        };
        *slot = Some(row.pixels);
        Ok(())
    }

    /// Read a pixel from a row that is home
    pub fn pixel(&self, x: usize, y: usize) -> Option<RawPixel> {
        self.rows.get(y)?.as_ref()?.get(x).copied()
    }

    /// Read a whole row that is home
    pub fn row(&self, y: usize) -> Option<&[RawPixel]> {
        self.rows.get(y)?.as_deref()
    }

    /// Drawing access to the frame
    ///
    /// Only available while every row is home, so nothing drawn here can be
    /// observed half-written by the scan-out context.
    pub fn view_mut(&mut self) -> Option<FrameView<'_, 'a>> {
        if !self.is_complete() {
            return None;
        }
        Some(FrameView::new(self.width, &mut self.rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_complete() {
        let mut storage = FrameStorage::<8, 4>::filled(0x1234);
        let frame = FrameBuffer::new(&mut storage);

        assert_eq!(frame.width(), 8);
        assert_eq!(frame.height(), 4);
        assert!(frame.is_complete());
        assert_eq!(frame.pixel(7, 3), Some(0x1234));
        assert_eq!(frame.pixel(8, 3), None);
    }

    #[test]
    fn test_take_row_lends_once() {
        let mut storage = FrameStorage::<8, 4>::new();
        let mut frame = FrameBuffer::new(&mut storage);

        let row = frame.take_row(2).unwrap();
        assert_eq!(row.index(), 2);
        assert_eq!(row.len(), 8);
        assert!(!frame.is_home(2));
        assert_eq!(frame.rows_lent(), 1);

        // Lent rows cannot be lent again
        assert!(frame.take_row(2).is_none());
        assert!(frame.take_row(4).is_none());

        // Nor drawn into
        assert!(frame.view_mut().is_none());
        assert_eq!(frame.pixel(0, 2), None);

        frame.restore(row).unwrap();
        assert!(frame.is_complete());
        assert!(frame.view_mut().is_some());
    }

    #[test]
    fn test_restore_rejects_foreign_rows() {
        let mut storage_a = FrameStorage::<8, 4>::new();
        let mut storage_b = FrameStorage::<6, 4>::new();
        let mut frame_a = FrameBuffer::new(&mut storage_a);
        let mut frame_b = FrameBuffer::new(&mut storage_b);

        // Wrong width
        let row = frame_b.take_row(1).unwrap();
        let row = frame_a.restore(row).unwrap_err();
        frame_b.restore(row).unwrap();

        // Slot already occupied
        let mut storage_c = FrameStorage::<8, 4>::new();
        let mut frame_c = FrameBuffer::new(&mut storage_c);
        let row = frame_c.take_row(0).unwrap();
        let row = frame_a.restore(row).unwrap_err();
        assert_eq!(row.index(), 0);
        frame_c.restore(row).unwrap();
    }

    #[test]
    fn test_rows_keep_content_across_handoff() {
        let mut storage = FrameStorage::<4, 2>::new();
        let mut frame = FrameBuffer::new(&mut storage);

        frame.view_mut().unwrap().fill(0xBEEF);
        let row = frame.take_row(1).unwrap();
        assert!(row.pixels().iter().all(|&p| p == 0xBEEF));
        frame.restore(row).unwrap();
        assert_eq!(frame.row(1), Some(&[0xBEEF; 4][..]));
    }
}
