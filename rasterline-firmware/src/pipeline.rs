//! Pipeline wiring for the two cores
//!
//! Core 0 runs the frame producer in the main task. Core 1 runs its own
//! executor with a single scan-out task.

use defmt::*;
use embassy_executor::Executor;
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::CORE1;
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use rasterline_content::SnakeEvent;
use rasterline_core::config::{PipelineConfig, TimingConfig};
use rasterline_core::{
    BringUpError, ContentGenerator, FrameBuffer, FrameProducer, FrameReport, FrameStorage,
    ScanoutPump,
};
use static_cell::StaticCell;

use crate::board::Scanout;
use crate::channels::SCANLINES;
use crate::clock::EmbassyClock;
use crate::config::{CORE1_STACK_SIZE, FRAME_HEIGHT, FRAME_WIDTH, READY_DEPTH};

/// Scan-out loop bound to the shared channel
pub type Pump = ScanoutPump<
    'static,
    'static,
    CriticalSectionRawMutex,
    Scanout,
    READY_DEPTH,
    FRAME_HEIGHT,
>;

/// Frame producer bound to the shared channel
pub type Producer<G> = FrameProducer<
    'static,
    'static,
    CriticalSectionRawMutex,
    EmbassyClock,
    G,
    READY_DEPTH,
    FRAME_HEIGHT,
>;

static CORE1_STACK: StaticCell<Stack<CORE1_STACK_SIZE>> = StaticCell::new();
static CORE1_EXECUTOR: StaticCell<Executor> = StaticCell::new();

/// Scan-out task - emits one line per call until the end of time
#[embassy_executor::task]
async fn scanout_task(mut pump: Pump) {
    info!("Scanout task started");
    pump.run().await
}

/// Start the sink and wrap it in a pump on the shared channel
pub fn prepare_scanout(sink: Scanout, timing: &TimingConfig) -> Result<Pump, BringUpError> {
    let mut pump = ScanoutPump::new(&SCANLINES, sink);
    pump.start(timing)?;
    info!("Scanout started: {}", timing.label.as_str());
    Ok(pump)
}

/// Hand the pump to core 1
pub fn launch_scanout(core1: Peri<'static, CORE1>, pump: Pump) {
    spawn_core1(core1, CORE1_STACK.init(Stack::new()), move || {
        let executor = CORE1_EXECUTOR.init(Executor::new());
        executor.run(|spawner| spawner.spawn(scanout_task(pump)).unwrap())
    });
}

/// Build the producer over the static frame storage
pub fn build_producer<G: ContentGenerator>(
    storage: &'static mut FrameStorage<FRAME_WIDTH, FRAME_HEIGHT>,
    generator: G,
    config: &PipelineConfig,
) -> Producer<G> {
    FrameProducer::new(FrameBuffer::new(storage), &SCANLINES, EmbassyClock, generator)
        .with_pacer(&config.pacer)
        .with_counter(&config.counter)
}

/// Log a throughput sample if the frame completed one
pub fn log_report(report: &FrameReport) {
    if let Some(sample) = report.throughput {
        info!("Time for {} frames: {} us", sample.frames, sample.elapsed_us);
    }
}

/// Log a game event
pub fn log_snake_event(event: SnakeEvent) {
    match event {
        SnakeEvent::Reset => info!("Game reset"),
        SnakeEvent::BorderCollision => info!("Collision with border"),
        SnakeEvent::SelfCollision => info!("Collision with itself"),
        SnakeEvent::FoodEaten => info!("Food eaten"),
    }
}
