//! End-to-end producer/consumer runs

mod common;

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::block_on;
use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

use common::{MockClock, RowStamp, StdClock};
use rasterline_core::config::{CounterConfig, PacerConfig, TimingConfig};
use rasterline_core::{
    BringUpError, Clock, FrameBuffer, FrameProducer, FrameStorage, ProducerState, RawPixel,
    ScanlineChannel, ScanoutPump, ScanoutSink, ThroughputSample,
};

const W: usize = 8;
const H: usize = 16;

#[test]
fn test_300_frames_one_throughput_sample() {
    let mut storage = FrameStorage::<W, H>::new();
    let channel: ScanlineChannel<'_, NoopRawMutex, H, H> = ScanlineChannel::new();
    let clock = MockClock::new(0);
    let mut producer = FrameProducer::new(
        FrameBuffer::new(&mut storage),
        &channel,
        &clock,
        RowStamp::default(),
    );

    let done = Cell::new(false);
    let produce = async {
        let mut samples: Vec<ThroughputSample> = Vec::new();
        for _ in 0..300 {
            let report = producer.run_frame().await;
            samples.extend(report.throughput);
        }
        done.set(true);
        samples
    };
    // Hands every row straight back
    let consume = async {
        while !done.get() {
            while let Some(row) = channel.consume() {
                channel.return_row(row).unwrap();
            }
            yield_now().await;
        }
    };

    let (samples, ()) = block_on(join(produce, consume));

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].frames, 300);
    assert!(
        (5_000_000..5_000_100).contains(&samples[0].elapsed_us),
        "elapsed {}",
        samples[0].elapsed_us
    );
    assert_eq!(producer.counter().value(), 300);
    assert_eq!(producer.frames_produced(), 300);
    assert_eq!(producer.state(), ProducerState::AwaitingDeadline);
    assert!(producer.frame().is_complete());
}

#[test]
fn test_stalled_consumer_stalls_producer_in_publishing() {
    const DEPTH: usize = 8;

    let mut storage = FrameStorage::<W, H>::new();
    let channel: ScanlineChannel<'_, NoopRawMutex, DEPTH, H> = ScanlineChannel::new();
    let clock = MockClock::new(0);
    let mut producer = FrameProducer::new(
        FrameBuffer::new(&mut storage),
        &channel,
        &clock,
        RowStamp::default(),
    );

    // Drains rows 0..=5 then never again
    let consume = async {
        let mut drained = 0;
        while drained < 6 {
            if let Some(row) = channel.consume() {
                assert_eq!(row.index(), drained);
                channel.return_row(row).unwrap();
                drained += 1;
            }
            yield_now().await;
        }
        for _ in 0..1_000 {
            yield_now().await;
        }
    };

    let outcome = block_on(select(producer.run_frame(), consume));
    assert!(matches!(outcome, Either::Second(())));

    assert_eq!(producer.state(), ProducerState::Publishing);
    assert_eq!(producer.generator().renders, 1);
    assert_eq!(producer.counter().value(), 0);
    assert_eq!(producer.frames_produced(), 0);
    assert_eq!(channel.ready_len(), DEPTH);
    assert!(!producer.frame().is_complete());
}

#[test]
fn test_rows_arrive_in_order_every_frame() {
    let mut storage = FrameStorage::<W, H>::new();
    let channel: ScanlineChannel<'_, NoopRawMutex, 4, H> = ScanlineChannel::new();
    let clock = MockClock::new(0);
    let mut producer = FrameProducer::new(
        FrameBuffer::new(&mut storage),
        &channel,
        &clock,
        RowStamp::default(),
    );

    let done = Cell::new(false);
    let seen: RefCell<Vec<(RawPixel, RawPixel)>> = RefCell::new(Vec::new());
    let produce = async {
        for _ in 0..5 {
            producer.run_frame().await;
        }
        done.set(true);
    };
    // One row per poll, so the shallow ready queue fills up
    let consume = async {
        while !done.get() {
            if let Some(row) = channel.consume() {
                seen.borrow_mut().push((row.pixels()[0], row.pixels()[1]));
                channel.return_row(row).unwrap();
            }
            yield_now().await;
        }
    };
    block_on(join(produce, consume));

    let seen = seen.into_inner();
    assert_eq!(seen.len(), 5 * H);
    for (frame, rows) in seen.chunks(H).enumerate() {
        for (y, &(index, row)) in rows.iter().enumerate() {
            assert_eq!(index, frame as RawPixel);
            assert_eq!(row, y as RawPixel);
        }
    }
}

#[test]
fn test_clear_requested_on_wrap() {
    let mut storage = FrameStorage::<W, H>::new();
    let channel: ScanlineChannel<'_, NoopRawMutex, H, H> = ScanlineChannel::new();
    let clock = MockClock::new(0);
    let mut producer = FrameProducer::new(
        FrameBuffer::new(&mut storage),
        &channel,
        &clock,
        RowStamp::default(),
    )
    .with_counter(&CounterConfig {
        ceiling: 4,
        restart: 1,
    });

    let done = Cell::new(false);
    let produce = async {
        let mut reports = Vec::new();
        for _ in 0..7 {
            reports.push(producer.run_frame().await);
        }
        done.set(true);
        reports
    };
    let consume = async {
        while !done.get() {
            while let Some(row) = channel.consume() {
                channel.return_row(row).unwrap();
            }
            yield_now().await;
        }
    };
    let (reports, ()) = block_on(join(produce, consume));

    let indices: Vec<u32> = reports.iter().map(|r| r.index).collect();
    let cleared: Vec<bool> = reports.iter().map(|r| r.cleared).collect();
    assert_eq!(indices, [1, 2, 3, 1, 2, 3, 1]);
    assert_eq!(cleared, [true, false, false, true, false, false, true]);
    assert_eq!(producer.generator().clears, 3);
}

/// Hands every published row straight back until `done` is set
async fn return_all<const DEPTH: usize>(
    channel: &ScanlineChannel<'_, NoopRawMutex, DEPTH, H>,
    done: &Cell<bool>,
) {
    while !done.get() {
        while let Some(row) = channel.consume() {
            channel.return_row(row).unwrap();
        }
        yield_now().await;
    }
}

#[test]
fn test_deadline_approached_in_halving_waits() {
    let mut storage = FrameStorage::<W, H>::new();
    let channel: ScanlineChannel<'_, NoopRawMutex, H, H> = ScanlineChannel::new();
    let clock = MockClock::new(0);
    let mut producer = FrameProducer::new(
        FrameBuffer::new(&mut storage),
        &channel,
        &clock,
        RowStamp::default(),
    );

    let done = Cell::new(false);
    let produce = async {
        producer.run_frame().await;
        done.set(true);
    };
    block_on(join(produce, return_all(&channel, &done)));

    // First deadline at 16666; each wait is half of what remains, and the
    // last two polls only nudge the clock past the deadline
    assert_eq!(
        clock.wait_log(),
        [8333, 4166, 2083, 1042, 521, 260, 130, 65, 33, 16, 8, 4, 2, 1, 1, 0, 0]
    );
    assert_eq!(clock.waits(), 17);
    assert_eq!(clock.now_us(), 16_667);
    assert!(clock.wait_log().iter().all(|&us| us <= 16_666 / 2));
}

#[test]
fn test_frame_abandoned_awaiting_returns_recovers() {
    let mut storage = FrameStorage::<W, H>::new();
    let channel: ScanlineChannel<'_, NoopRawMutex, H, H> = ScanlineChannel::new();
    let held = RefCell::new(Vec::new());
    let clock = MockClock::new(0);
    let mut producer = FrameProducer::new(
        FrameBuffer::new(&mut storage),
        &channel,
        &clock,
        RowStamp::default(),
    );

    // Reads the whole frame but only hands back rows 0..10
    let hoard = async {
        let mut seen = 0;
        while seen < H {
            if let Some(row) = channel.consume() {
                if row.index() < 10 {
                    channel.return_row(row).unwrap();
                } else {
                    held.borrow_mut().push(row);
                }
                seen += 1;
            }
            yield_now().await;
        }
        for _ in 0..100 {
            yield_now().await;
        }
    };
    let outcome = block_on(select(producer.run_frame(), hoard));
    assert!(matches!(outcome, Either::Second(())));
    assert_eq!(producer.state(), ProducerState::AwaitingReturns);
    assert_eq!(held.borrow().len(), H - 10);

    for row in held.borrow_mut().drain(..) {
        channel.return_row(row).unwrap();
    }

    let done = Cell::new(false);
    let order = RefCell::new(Vec::new());
    let produce = async {
        let report = producer.run_frame().await;
        done.set(true);
        report
    };
    let consume = async {
        while !done.get() {
            while let Some(row) = channel.consume() {
                order.borrow_mut().push(row.index());
                channel.return_row(row).unwrap();
            }
            yield_now().await;
        }
    };
    let (report, ()) = block_on(join(produce, consume));

    // The abandoned frame is not counted and nothing is published twice
    assert_eq!(report.index, 0);
    assert_eq!(producer.frames_produced(), 1);
    assert_eq!(producer.generator().renders, 2);
    assert_eq!(order.into_inner(), (0..H).collect::<Vec<_>>());
    assert_eq!(producer.state(), ProducerState::AwaitingDeadline);
    assert!(producer.frame().is_complete());
}

/// Sink that checks every row it is given belongs to the same frame
#[derive(Default)]
struct FrameCheckSink {
    current: Option<RawPixel>,
    torn_rows: u32,
}

impl ScanoutSink for FrameCheckSink {
    fn start(&mut self, _timing: &TimingConfig) -> Result<(), BringUpError> {
        Ok(())
    }

    async fn emit_line(&mut self, pixels: &[RawPixel]) {
        if pixels[1] == 0 {
            self.current = Some(pixels[0]);
        } else if self.current != Some(pixels[0]) {
            self.torn_rows += 1;
        }
    }

    async fn emit_blank(&mut self) {
        std::thread::yield_now();
    }
}

#[test]
fn test_two_threads() {
    const FRAMES: u32 = 40;

    let mut storage = FrameStorage::<W, H>::new();
    let channel: ScanlineChannel<'_, CriticalSectionRawMutex, 4, H> = ScanlineChannel::new();
    let done = AtomicBool::new(false);
    let frame = FrameBuffer::new(&mut storage);

    let (stats, sink) = std::thread::scope(|s| {
        let consumer = s.spawn(|| {
            let mut pump = ScanoutPump::new(&channel, FrameCheckSink::default());
            pump.start(&TimingConfig::default()).unwrap();
            block_on(async {
                pump.wait_for_first_row().await;
                while !done.load(Ordering::Acquire) {
                    pump.service_line().await;
                }
            });
            let stats = pump.stats();
            let sink = pump.sink();
            (stats, (sink.current, sink.torn_rows))
        });

        let clock = StdClock::new();
        let mut producer = FrameProducer::new(frame, &channel, &clock, RowStamp::default())
            .with_pacer(&PacerConfig {
                short_interval_us: 500,
                long_interval_us: 501,
                sample_every: 0,
            });
        block_on(async {
            for _ in 0..FRAMES {
                producer.run_frame().await;
            }
        });
        assert_eq!(producer.counter().value(), FRAMES);
        done.store(true, Ordering::Release);

        consumer.join().unwrap()
    });

    assert_eq!(stats.lines, FRAMES as u64 * H as u64);
    assert_eq!(stats.order_faults, 0);
    assert_eq!(stats.lost_rows, 0);
    assert_eq!(sink, (Some(FRAMES as RawPixel - 1), 0));
}
