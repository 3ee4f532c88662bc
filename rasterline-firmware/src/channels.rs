//! Statics shared between the two cores
//!
//! The frame storage is taken once by the producer; the scanline channel is
//! the only thing both cores touch afterwards.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use rasterline_core::{FrameStorage, ScanlineChannel};
use static_cell::ConstStaticCell;

use crate::config::{FRAME_HEIGHT, FRAME_WIDTH, READY_DEPTH};

/// Frame pixels (allocated once, never resized)
pub static FRAME: ConstStaticCell<FrameStorage<FRAME_WIDTH, FRAME_HEIGHT>> =
    ConstStaticCell::new(FrameStorage::new());

/// Row handoff between the producer (core 0) and scan-out (core 1)
pub static SCANLINES: ScanlineChannel<'static, CriticalSectionRawMutex, READY_DEPTH, FRAME_HEIGHT> =
    ScanlineChannel::new();
