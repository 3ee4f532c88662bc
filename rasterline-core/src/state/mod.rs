//! Frame producer state machine
//!
//! The producer cycles through a fixed sequence of phases every frame.
//! Transitions are a pure function of the current state and an event, so
//! the sequence can be checked without any hardware or executor.

pub mod events;
pub mod machine;

pub use events::ProducerEvent;
pub use machine::ProducerState;
