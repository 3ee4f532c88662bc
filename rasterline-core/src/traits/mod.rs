//! Hardware and application boundary traits
//!
//! These traits define the interface between the pipeline and the
//! board-specific clock and video sink, and between the pipeline and the
//! application drawing into the frame.

pub mod clock;
pub mod content;
pub mod scanout;

pub use clock::Clock;
pub use content::{ContentGenerator, FrameContext};
pub use scanout::{BringUpError, ScanoutSink};
