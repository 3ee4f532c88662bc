//! Monotonic time source

/// Monotonic microsecond clock used for frame pacing
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin
    ///
    /// Must never go backwards.
    fn now_us(&self) -> u64;

    /// Spin for roughly `us` microseconds without yielding
    ///
    /// The pacer only asks for waits shorter than half a frame, where a
    /// real sleep would cost more than it saves.
    fn busy_wait_us(&self, us: u64);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }

    fn busy_wait_us(&self, us: u64) {
        (**self).busy_wait_us(us)
    }
}
