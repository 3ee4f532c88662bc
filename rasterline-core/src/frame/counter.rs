//! Wrapping frame counter

use crate::config::CounterConfig;

/// Frame index handed to content generators
///
/// Counts up from `restart` and wraps back to `restart` when it reaches
/// `ceiling`, so the ceiling value itself is never observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameCounter {
    value: u32,
    ceiling: u32,
    restart: u32,
}

impl FrameCounter {
    /// Create a counter starting at the restart value
    pub const fn new(ceiling: u32, restart: u32) -> Self {
        Self {
            value: restart,
            ceiling,
            restart,
        }
    }

    /// Create a counter from configuration
    pub const fn from_config(config: &CounterConfig) -> Self {
        Self::new(config.ceiling, config.restart)
    }

    /// Current frame index
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Wrap point
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Value the counter restarts from
    pub fn restart(&self) -> u32 {
        self.restart
    }

    /// Check whether the counter sits on its restart value
    ///
    /// Content generators clear the whole frame on this frame.
    pub fn is_at_restart(&self) -> bool {
        self.value == self.restart
    }

    /// Move to the next frame index, wrapping at the ceiling
    pub fn advance(&mut self) -> u32 {
        self.value = self.value.wrapping_add(1);
        if self.value >= self.ceiling {
            self.value = self.restart;
        }
        self.value
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::from_config(&CounterConfig::default())
    }
}
