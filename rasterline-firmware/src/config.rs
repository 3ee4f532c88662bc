//! Compile-time display configuration
//!
//! Constants come from display.toml via build.rs; the functions below turn
//! them into the library configuration types.

use heapless::String;
use rasterline_content::{DigitCounterConfig, SnakeConfig};
use rasterline_core::config::{
    CounterConfig, FrameConfig, PacerConfig, PipelineConfig, TimingConfig,
};

include!(concat!(env!("OUT_DIR"), "/display_config.rs"));

/// Core 1 stack size in bytes
pub const CORE1_STACK_SIZE: usize = 4096;

/// Complete pipeline configuration
pub fn pipeline_config() -> PipelineConfig {
    let mut label = String::new();
    let _ = label.push_str(TIMING_LABEL);

    PipelineConfig {
        frame: FrameConfig {
            width: FRAME_WIDTH as u16,
            height: FRAME_HEIGHT as u16,
            ready_depth: READY_DEPTH as u16,
        },
        timing: TimingConfig {
            label,
            pixel_clock_khz: PIXEL_CLOCK_KHZ,
            bit_clock_khz: BIT_CLOCK_KHZ,
            h_active: H_ACTIVE,
            v_active: V_ACTIVE,
        },
        pacer: PacerConfig {
            short_interval_us: SHORT_INTERVAL_US,
            long_interval_us: LONG_INTERVAL_US,
            sample_every: SAMPLE_EVERY,
        },
        counter: CounterConfig {
            ceiling: COUNTER_CEILING,
            restart: COUNTER_RESTART,
        },
    }
}

/// Digit counter configuration
pub fn counter_config() -> DigitCounterConfig {
    DigitCounterConfig::default()
}

/// Snake game configuration
pub fn snake_config() -> SnakeConfig {
    SnakeConfig {
        block_size: SNAKE_BLOCK_SIZE,
        move_every_frames: SNAKE_MOVE_EVERY_FRAMES,
        seed: SNAKE_SEED,
        ..SnakeConfig::default()
    }
}
