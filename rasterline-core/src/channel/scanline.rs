//! Bounded row exchange

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::frame::ScanlineRef;

/// Bounded exchange of row references
///
/// `DEPTH` is the capacity of the ready queue and bounds how far the
/// producer may run ahead of the sink. `H` is the frame height; the returned
/// queue holds a whole frame, so handing a row back never waits.
///
/// Waiting sides park on the channel's wakers and re-test their condition
/// on every wake, so spurious wakes only cost a poll.
pub struct ScanlineChannel<'a, M: RawMutex, const DEPTH: usize, const H: usize> {
    ready: Channel<M, ScanlineRef<'a>, DEPTH>,
    returned: Channel<M, ScanlineRef<'a>, H>,
}

impl<'a, M: RawMutex, const DEPTH: usize, const H: usize> ScanlineChannel<'a, M, DEPTH, H> {
    /// Create an empty channel
    pub const fn new() -> Self {
        Self {
            ready: Channel::new(),
            returned: Channel::new(),
        }
    }

    /// Queue a drawn row for scan-out, waiting while the ready queue is full
    ///
    /// This is the only place the sink can hold the producer back.
    pub async fn publish(&self, row: ScanlineRef<'a>) {
        self.ready.send(row).await;
    }

    /// Queue a drawn row for scan-out without waiting
    ///
    /// Hands the row back if the ready queue is full.
    pub fn try_publish(&self, row: ScanlineRef<'a>) -> Result<(), ScanlineRef<'a>> {
        self.ready.try_send(row).map_err(into_row)
    }

    /// Take the next row for scan-out
    ///
    /// Never waits: the sink runs on the output clock and emits a blank
    /// line instead.
    pub fn consume(&self) -> Option<ScanlineRef<'a>> {
        self.ready.try_receive().ok()
    }

    /// Hand a row back once its pixels have been emitted
    ///
    /// Cannot fail while rows only come from one frame of height `H`; a row
    /// is handed back if the returned queue is somehow full.
    pub fn return_row(&self, row: ScanlineRef<'a>) -> Result<(), ScanlineRef<'a>> {
        self.returned.try_send(row).map_err(into_row)
    }

    /// Wait for the next returned row
    pub async fn collect_returned(&self) -> ScanlineRef<'a> {
        self.returned.receive().await
    }

    /// Take a returned row if one is waiting
    pub fn try_collect_returned(&self) -> Option<ScanlineRef<'a>> {
        self.returned.try_receive().ok()
    }

    /// Rows published but not yet consumed
    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    /// Rows returned but not yet collected
    pub fn returned_len(&self) -> usize {
        self.returned.len()
    }

    /// Check whether a row is waiting for scan-out
    pub fn has_ready(&self) -> bool {
        !self.ready.is_empty()
    }
}

fn into_row(err: TrySendError<ScanlineRef<'_>>) -> ScanlineRef<'_> {
    match err {
        TrySendError::Full(row) => row,
    }
}

impl<M: RawMutex, const DEPTH: usize, const H: usize> Default for ScanlineChannel<'_, M, DEPTH, H> {
    fn default() -> Self {
        Self::new()
    }
}
