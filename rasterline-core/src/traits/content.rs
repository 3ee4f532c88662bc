//! Content generator interface

use crate::frame::FrameView;

/// Per-frame input handed to a content generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameContext {
    /// Current frame counter value
    pub index: u32,
    /// The counter sits on its restart value: erase the whole frame first
    pub clear_requested: bool,
}

/// Application that draws into the frame
///
/// Called once per frame, while every row is home. Anything not redrawn
/// keeps the previous frame's pixels. Must finish well within one frame
/// interval or the pacer falls behind.
pub trait ContentGenerator {
    /// Draw one frame
    fn render(&mut self, frame: FrameContext, view: &mut FrameView<'_, '_>);
}

impl<G: ContentGenerator + ?Sized> ContentGenerator for &mut G {
    fn render(&mut self, frame: FrameContext, view: &mut FrameView<'_, '_>) {
        (**self).render(frame, view)
    }
}
