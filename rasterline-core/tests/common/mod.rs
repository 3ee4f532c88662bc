//! Shared test doubles
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use rasterline_core::{Clock, ContentGenerator, FrameContext, FrameView};

/// Clock that only moves when waited on
///
/// Every wait advances time by at least one microsecond, so a pacer poll
/// loop always makes progress.
pub struct MockClock {
    now: Cell<u64>,
    waits: RefCell<Vec<u64>>,
}

impl MockClock {
    pub fn new(start_us: u64) -> Self {
        Self {
            now: Cell::new(start_us),
            waits: RefCell::new(Vec::new()),
        }
    }

    /// Number of busy-waits so far
    pub fn waits(&self) -> usize {
        self.waits.borrow().len()
    }

    /// Requested length of every busy-wait so far
    pub fn wait_log(&self) -> Vec<u64> {
        self.waits.borrow().clone()
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }

    fn busy_wait_us(&self, us: u64) {
        self.waits.borrow_mut().push(us);
        self.now.set(self.now.get() + us.max(1));
    }
}

/// Wall clock for multi-threaded runs
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }

    fn busy_wait_us(&self, us: u64) {
        let until = Instant::now() + Duration::from_micros(us);
        while Instant::now() < until {
            std::hint::spin_loop();
        }
    }
}

/// Writes the frame index into the first pixel of every row and the row
/// index into the second
#[derive(Default)]
pub struct RowStamp {
    pub renders: u32,
    pub clears: u32,
}

impl ContentGenerator for RowStamp {
    fn render(&mut self, frame: FrameContext, view: &mut FrameView<'_, '_>) {
        self.renders += 1;
        if frame.clear_requested {
            self.clears += 1;
            view.fill(0);
        }
        for y in 0..view.height() {
            view.set(0, y, frame.index as u16);
            view.set(1, y, y as u16);
        }
    }
}
