//! Frame producer
//!
//! Drives one frame at a time through the producer state machine:
//!
//! 1. Poll the pacer, busy-waiting half the remaining time between polls
//! 2. Let the content generator draw while every row is home
//! 3. Publish rows `0..H` in order, reclaiming rows the sink has finished
//! 4. Wait until every row is home again
//! 5. Advance the frame counter and sample throughput
//!
//! A sink that stops draining stalls the producer in step 3 or 4 for good.
//! There is no timeout and no mid-frame abort.
//!
//! A `run_frame` future dropped in step 4 leaves the producer in
//! `AwaitingReturns`; the next `run_frame` first collects the outstanding
//! rows and does not count the abandoned frame. Dropped in step 3, the row
//! whose publish was pending is lost with the future, so the frame can never
//! be completed and the next `run_frame` waits for it forever instead of
//! drawing into or republishing a partial frame.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::pacer::{Deadline, FramePacer, ThroughputSample};
use crate::channel::ScanlineChannel;
use crate::config::{CounterConfig, PacerConfig};
use crate::frame::{FrameBuffer, FrameCounter, ScanlineRef};
use crate::state::{ProducerEvent, ProducerState};
use crate::traits::{Clock, ContentGenerator, FrameContext};

/// Summary of one produced frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameReport {
    /// Frame counter value the frame was drawn with
    pub index: u32,
    /// The generator was asked to clear the whole frame
    pub cleared: bool,
    /// Throughput sample completed by this frame, if any
    pub throughput: Option<ThroughputSample>,
}

/// Producer side of the pipeline
pub struct FrameProducer<'a, 'c, M, C, G, const DEPTH: usize, const H: usize>
where
    M: RawMutex,
    C: Clock,
    G: ContentGenerator,
{
    frame: FrameBuffer<'a, H>,
    channel: &'c ScanlineChannel<'a, M, DEPTH, H>,
    pacer: FramePacer,
    counter: FrameCounter,
    clock: C,
    generator: G,
    state: ProducerState,
    frames_produced: u64,
}

impl<'a, 'c, M, C, G, const DEPTH: usize, const H: usize> FrameProducer<'a, 'c, M, C, G, DEPTH, H>
where
    M: RawMutex,
    C: Clock,
    G: ContentGenerator,
{
    /// Create a producer with the default pacing and counter wrap
    pub fn new(
        frame: FrameBuffer<'a, H>,
        channel: &'c ScanlineChannel<'a, M, DEPTH, H>,
        clock: C,
        generator: G,
    ) -> Self {
        Self {
            frame,
            channel,
            pacer: FramePacer::default(),
            counter: FrameCounter::default(),
            clock,
            generator,
            state: ProducerState::Idle,
            frames_produced: 0,
        }
    }

    /// Replace the pacing configuration
    pub fn with_pacer(mut self, config: &PacerConfig) -> Self {
        self.pacer = FramePacer::new(config);
        self
    }

    /// Replace the counter wrap configuration
    pub fn with_counter(mut self, config: &CounterConfig) -> Self {
        self.counter = FrameCounter::from_config(config);
        self
    }

    /// Current phase
    pub fn state(&self) -> ProducerState {
        self.state
    }

    /// Frame counter
    pub fn counter(&self) -> &FrameCounter {
        &self.counter
    }

    /// Frame pacer
    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    /// Content generator
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Mutable access to the content generator, e.g. to feed it input
    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    /// The frame buffer
    pub fn frame(&self) -> &FrameBuffer<'a, H> {
        &self.frame
    }

    /// Frames completed since construction (does not wrap)
    pub fn frames_produced(&self) -> u64 {
        self.frames_produced
    }

    /// Anchor the pacer to the current time
    ///
    /// Has no effect once started.
    pub fn start(&mut self) {
        if self.state == ProducerState::Idle {
            self.pacer.start(self.clock.now_us());
            self.apply(ProducerEvent::Started);
        }
    }

    /// Produce exactly one frame
    pub async fn run_frame(&mut self) -> FrameReport {
        if self.state.rows_in_flight() {
            self.await_returns().await;
        }
        self.start();

        self.await_deadline();
        self.apply(ProducerEvent::DeadlineFired);

        let context = FrameContext {
            index: self.counter.value(),
            clear_requested: self.counter.is_at_restart(),
        };
        if self.state.may_mutate_frame() {
            if let Some(mut view) = self.frame.view_mut() {
                self.generator.render(context, &mut view);
            }
        }
        self.apply(ProducerEvent::FrameRendered);

        for index in 0..H {
            self.reclaim_returned();
            if let Some(row) = self.frame.take_row(index) {
                self.channel.publish(row).await;
            }
        }
        self.apply(ProducerEvent::RowsPublished);
        self.await_returns().await;

        self.counter.advance();
        self.frames_produced += 1;
        let throughput = self.pacer.record_frame(self.clock.now_us());

        FrameReport {
            index: context.index,
            cleared: context.clear_requested,
            throughput,
        }
    }

    /// Produce frames forever
    ///
    /// `on_frame` sees every report and the generator, after the frame's
    /// rows are home and before the next deadline is awaited.
    pub async fn run<F>(&mut self, mut on_frame: F) -> !
    where
        F: FnMut(&FrameReport, &mut G),
    {
        loop {
            let report = self.run_frame().await;
            on_frame(&report, &mut self.generator);
        }
    }

    fn await_deadline(&mut self) {
        loop {
            match self.pacer.next_deadline(self.clock.now_us()) {
                Deadline::Due => return,
                pending => self.clock.busy_wait_us(pending.wait_hint()),
            }
        }
    }

    async fn await_returns(&mut self) {
        while !self.frame.is_complete() {
            let row = self.channel.collect_returned().await;
            self.restore(row);
        }
        self.apply(ProducerEvent::RowsReturned);
    }

    fn reclaim_returned(&mut self) {
        while let Some(row) = self.channel.try_collect_returned() {
            self.restore(row);
        }
    }

    fn restore(&mut self, row: ScanlineRef<'a>) {
        // Only rows lent by this buffer come back through its channel; a
        // stray row is dropped rather than written into a foreign slot.
        let _ = self.frame.restore(row);
    }

    fn apply(&mut self, event: ProducerEvent) {
        self.state = self.state.transition(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameStorage, FrameView};
    use core::cell::Cell;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_futures::yield_now;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    /// Clock that only moves when waited on
    struct StepClock(Cell<u64>);

    impl Clock for StepClock {
        fn now_us(&self) -> u64 {
            self.0.get()
        }

        fn busy_wait_us(&self, us: u64) {
            self.0.set(self.0.get() + us.max(1));
        }
    }

    /// Fills the frame with the frame index
    #[derive(Default)]
    struct IndexFill {
        clears: u32,
    }

    impl ContentGenerator for IndexFill {
        fn render(&mut self, frame: FrameContext, view: &mut FrameView<'_, '_>) {
            if frame.clear_requested {
                self.clears += 1;
            }
            view.fill(frame.index as u16);
        }
    }

    #[test]
    fn test_starts_idle() {
        let mut storage = FrameStorage::<4, 4>::new();
        let channel: ScanlineChannel<'_, NoopRawMutex, 4, 4> = ScanlineChannel::new();
        let clock = StepClock(Cell::new(0));
        let mut producer = FrameProducer::new(
            FrameBuffer::new(&mut storage),
            &channel,
            &clock,
            IndexFill::default(),
        );

        assert_eq!(producer.state(), ProducerState::Idle);
        producer.start();
        assert_eq!(producer.state(), ProducerState::AwaitingDeadline);
        assert_eq!(producer.pacer().deadline_us(), 16_666);
    }

    #[test]
    fn test_frame_round_trip() {
        let mut storage = FrameStorage::<4, 4>::new();
        let channel: ScanlineChannel<'_, NoopRawMutex, 4, 4> = ScanlineChannel::new();
        let clock = StepClock(Cell::new(0));
        let mut producer = FrameProducer::new(
            FrameBuffer::new(&mut storage),
            &channel,
            &clock,
            IndexFill::default(),
        )
        .with_counter(&CounterConfig {
            ceiling: 3,
            restart: 0,
        });

        let done = Cell::new(false);
        let produce = async {
            let mut reports = [None; 4];
            for report in reports.iter_mut() {
                let frame = producer.run_frame().await;
                assert_eq!(producer.state(), ProducerState::AwaitingDeadline);
                assert!(producer.frame().is_complete());
                assert_eq!(producer.frame().pixel(0, 3), Some(frame.index as u16));
                *report = Some(frame);
            }
            done.set(true);
            reports
        };
        let consume = async {
            while !done.get() {
                if let Some(row) = channel.consume() {
                    channel.return_row(row).unwrap();
                }
                yield_now().await;
            }
        };

        let (reports, ()) = block_on(join(produce, consume));
        let indices = reports.map(|r| r.unwrap().index);
        let cleared = reports.map(|r| r.unwrap().cleared);

        assert_eq!(indices, [0, 1, 2, 0]);
        assert_eq!(cleared, [true, false, false, true]);
        assert_eq!(producer.frames_produced(), 4);
        assert_eq!(producer.generator().clears, 2);
    }
}
