//! RP2040 board bring-up
//!
//! Pin assignment:
//! - GPIO0..=15: parallel RGB565 data
//! - GPIO16: pixel clock

use embassy_rp::bind_interrupts;
use embassy_rp::clocks::{ClockConfig, CoreVoltage};
use embassy_rp::peripherals::{CORE1, PIO0};
use embassy_rp::pio::{Common, InterruptHandler, Pio};
use embassy_rp::Peri;
use rasterline_core::config::PipelineConfig;
use rasterline_core::BringUpError;

use crate::config::FRAME_WIDTH;
use crate::scanout::PioScanout;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

/// Scan-out sink on PIO0, state machine 0
pub type Scanout = PioScanout<'static, PIO0, 0>;

/// Peripherals handed out by bring-up
pub struct Board {
    /// Video sink, not yet started
    pub scanout: Scanout,
    /// Second core, for the scan-out executor
    pub core1: Peri<'static, CORE1>,
    _common: Common<'static, PIO0>,
}

/// Run the system clock at the bit clock and set up the scan-out sink
///
/// Fails without touching the hardware if the configuration is invalid or
/// the pixel clock cannot be reached from the requested system clock.
pub fn bring_up(config: &PipelineConfig) -> Result<Board, BringUpError> {
    config.validate()?;

    let sys_hz = config.timing.system_clock_hz();
    if config
        .timing
        .scanout_divider_x256(sys_hz, FRAME_WIDTH as u16)
        .is_none()
    {
        return Err(BringUpError::PixelClockUnreachable);
    }

    let mut clocks = ClockConfig::system_freq(sys_hz).map_err(|_| BringUpError::ClockRejected)?;
    // 252 MHz is beyond the rated clock at the default 1.10 V
    clocks.core_voltage = CoreVoltage::V1_20;

    let p = embassy_rp::init(embassy_rp::config::Config::new(clocks));

    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);

    let data = [
        common.make_pio_pin(p.PIN_0),
        common.make_pio_pin(p.PIN_1),
        common.make_pio_pin(p.PIN_2),
        common.make_pio_pin(p.PIN_3),
        common.make_pio_pin(p.PIN_4),
        common.make_pio_pin(p.PIN_5),
        common.make_pio_pin(p.PIN_6),
        common.make_pio_pin(p.PIN_7),
        common.make_pio_pin(p.PIN_8),
        common.make_pio_pin(p.PIN_9),
        common.make_pio_pin(p.PIN_10),
        common.make_pio_pin(p.PIN_11),
        common.make_pio_pin(p.PIN_12),
        common.make_pio_pin(p.PIN_13),
        common.make_pio_pin(p.PIN_14),
        common.make_pio_pin(p.PIN_15),
    ];
    let clock = common.make_pio_pin(p.PIN_16);

    let scanout = PioScanout::new(&mut common, sm0, data, clock, FRAME_WIDTH);

    Ok(Board {
        scanout,
        core1: p.CORE1,
        _common: common,
    })
}
