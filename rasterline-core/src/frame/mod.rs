//! Frame storage and the row ownership contract
//!
//! The frame is the only memory shared between the producer and the
//! scan-out context. It is never locked: each row is a unique borrow that
//! moves between the two contexts.
//!
//! ```text
//!   FrameBuffer (home) ──take_row──▶ ScanlineRef ──publish──▶ ready queue
//!        ▲                                                        │
//!        └──restore── ScanlineRef ◀──collect── returned queue ◀───┘
//! ```
//!
//! Drawing is only possible through a `FrameView`, which exists only while
//! every row is home.

pub mod buffer;
pub mod counter;
pub mod view;

pub use buffer::{FrameBuffer, FrameStorage, RawPixel, ScanlineRef};
pub use counter::FrameCounter;
pub use view::{rgb565, FrameView};
