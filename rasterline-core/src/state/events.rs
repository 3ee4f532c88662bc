//! Events that trigger producer state transitions

/// Events raised by the frame producer as it works through a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProducerEvent {
    /// Pacer anchored to the first clock sample
    Started,
    /// The frame deadline has passed
    DeadlineFired,
    /// Content generator finished drawing
    FrameRendered,
    /// Every row of the frame is in the ready queue or already consumed
    RowsPublished,
    /// Every row of the frame is home again
    RowsReturned,
}
