//! Producer state definition

use super::events::ProducerEvent;

/// Frame producer phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProducerState {
    /// Constructed, pacer not yet anchored
    #[default]
    Idle,
    /// Polling the pacer for the next deadline
    AwaitingDeadline,
    /// Content generator is drawing into the frame
    Rendering,
    /// Handing rows to the scan-out context in index order
    Publishing,
    /// Waiting for the scan-out context to hand every row back
    AwaitingReturns,
}

impl ProducerState {
    /// Check if the frame may be drawn into in this state
    pub fn may_mutate_frame(&self) -> bool {
        matches!(self, ProducerState::Rendering)
    }

    /// Check if rows may be lent out in this state
    pub fn rows_in_flight(&self) -> bool {
        matches!(
            self,
            ProducerState::Publishing | ProducerState::AwaitingReturns
        )
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: ProducerEvent) -> Self {
        use ProducerEvent::*;
        use ProducerState::*;

        match (self, event) {
            (Idle, Started) => AwaitingDeadline,
            (AwaitingDeadline, DeadlineFired) => Rendering,
            (Rendering, FrameRendered) => Publishing,
            (Publishing, RowsPublished) => AwaitingReturns,
            (AwaitingReturns, RowsReturned) => AwaitingDeadline,

            // Everything else is ignored
            _ => self,
        }
    }
}
