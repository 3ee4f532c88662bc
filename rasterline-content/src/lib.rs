//! Content generators for the Rasterline pipeline
//!
//! Each generator draws into a `FrameView` once per frame:
//!
//! - `DigitCounter` shows the frame index as a centred decimal number
//! - `SnakeGame` runs a grid snake game that resets on collision

#![no_std]
#![deny(unsafe_code)]

pub mod counter;
pub mod font;
pub mod palette;
pub mod snake;

pub use counter::{DigitCounter, DigitCounterConfig};
pub use snake::{Cell, Direction, SnakeConfig, SnakeEvent, SnakeGame, StepOutcome};
