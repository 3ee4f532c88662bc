//! Rasterline snake demo
//!
//! The snake wanders right until it hits the border, then starts over.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use rasterline_content::SnakeGame;
use {defmt_rtt as _, panic_probe as _};

use rasterline_firmware::board::bring_up;
use rasterline_firmware::channels::FRAME;
use rasterline_firmware::config::{pipeline_config, snake_config, FRAME_HEIGHT, FRAME_WIDTH};
use rasterline_firmware::pipeline::{
    build_producer, launch_scanout, log_report, log_snake_event, prepare_scanout,
};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Rasterline snake starting...");

    let config = pipeline_config();
    let board = match bring_up(&config) {
        Ok(board) => board,
        Err(e) => defmt::panic!("Bring-up failed: {}", e),
    };
    info!("Board initialized");

    let game = match SnakeGame::new(snake_config(), FRAME_WIDTH as u16, FRAME_HEIGHT as u16) {
        Ok(game) => game,
        Err(e) => defmt::panic!("Invalid snake config: {}", e),
    };

    let pump = match prepare_scanout(board.scanout, &config.timing) {
        Ok(pump) => pump,
        Err(e) => defmt::panic!("Scanout failed to start: {}", e),
    };
    launch_scanout(board.core1, pump);

    let mut producer = build_producer(FRAME.take(), game, &config);
    info!("Game start");

    producer
        .run(|report, game| {
            log_report(report);
            while let Some(event) = game.pop_event() {
                log_snake_event(event);
            }
        })
        .await
}
