//! Grid snake game
//!
//! The playfield is a grid of square blocks with a one-block border ring.
//! The snake moves one cell every few frames; running into the border or
//! into itself resets the game.

pub mod game;
pub mod grid;

pub use game::{SnakeConfig, SnakeEvent, SnakeGame, StepOutcome, MAX_EVENTS, MAX_SNAKE_LEN};
pub use grid::{Cell, Direction, Grid};
