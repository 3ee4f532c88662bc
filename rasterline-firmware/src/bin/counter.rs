//! Rasterline counter demo
//!
//! Draws the frame counter, centred, once per frame.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use rasterline_content::DigitCounter;
use {defmt_rtt as _, panic_probe as _};

use rasterline_firmware::board::bring_up;
use rasterline_firmware::channels::FRAME;
use rasterline_firmware::config::{counter_config, pipeline_config, FRAME_WIDTH};
use rasterline_firmware::pipeline::{build_producer, launch_scanout, log_report, prepare_scanout};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Rasterline counter starting...");

    let config = pipeline_config();
    let board = match bring_up(&config) {
        Ok(board) => board,
        Err(e) => defmt::panic!("Bring-up failed: {}", e),
    };
    info!("Board initialized");

    let counter_config = counter_config();
    if let Err(e) = counter_config.validate(FRAME_WIDTH as u16) {
        defmt::panic!("Invalid counter config: {}", e);
    }

    let pump = match prepare_scanout(board.scanout, &config.timing) {
        Ok(pump) => pump,
        Err(e) => defmt::panic!("Scanout failed to start: {}", e),
    };
    launch_scanout(board.core1, pump);

    let mut producer = build_producer(FRAME.take(), DigitCounter::new(counter_config), &config);
    info!("Producer running");

    producer
        .run(|report, _counter| log_report(report))
        .await
}
