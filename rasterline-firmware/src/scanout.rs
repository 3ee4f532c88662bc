//! PIO scan-out sink
//!
//! Streams RGB565 rows onto 16 parallel data pins with a pixel clock on a
//! side-set pin, for an external serialiser. Each FIFO word carries two
//! pixels, first pixel in the low half.

use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, Pin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use fixed::types::U24F8;
use rasterline_core::config::TimingConfig;
use rasterline_core::{BringUpError, RawPixel, ScanoutSink};

/// Number of parallel data pins
pub const DATA_PINS: usize = 16;

/// Parallel-output video sink on one PIO state machine
pub struct PioScanout<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
    /// Pixels per row
    width: usize,
    _data: [Pin<'d, PIO>; DATA_PINS],
    _clock: Pin<'d, PIO>,
}

impl<'d, PIO: Instance, const SM: usize> PioScanout<'d, PIO, SM> {
    /// Load the scan-out program and configure the state machine
    ///
    /// The state machine stays disabled until `start`.
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        data: [Pin<'d, PIO>; DATA_PINS],
        clock: Pin<'d, PIO>,
        width: usize,
    ) -> Self {
        // One pixel per two cycles: data changes with the clock low and is
        // latched on the rising edge
        let prg = pio::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "out pins, 16 side 0",
            "nop side 1",
            ".wrap"
        );

        let installed = common.load_program(&prg.program);

        let data_refs: [&Pin<'d, PIO>; DATA_PINS] = core::array::from_fn(|i| &data[i]);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&clock]);
        cfg.set_out_pins(&data_refs);
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 32,
            direction: ShiftDirection::Right,
        };
        cfg.fifo_join = FifoJoin::TxOnly;

        // Slowest divider until the raster timing is known
        cfg.clock_divider = U24F8::from_bits(0xFFFF_FF00);

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::Out, &data_refs);
        sm.set_pin_dirs(PioDirection::Out, &[&clock]);

        Self {
            sm,
            width,
            _data: data,
            _clock: clock,
        }
    }

    async fn push_pairs(&mut self, pixels: &[RawPixel]) {
        for pair in pixels.chunks(2) {
            let first = pair[0] as u32;
            let second = pair.get(1).copied().unwrap_or(0) as u32;
            self.sm.tx().wait_push(first | (second << 16)).await;
        }
    }
}

impl<'d, PIO: Instance, const SM: usize> ScanoutSink for PioScanout<'d, PIO, SM> {
    fn start(&mut self, timing: &TimingConfig) -> Result<(), BringUpError> {
        let width = u16::try_from(self.width).map_err(|_| BringUpError::PixelClockUnreachable)?;
        let divider = timing
            .scanout_divider_x256(timing.system_clock_hz(), width)
            .ok_or(BringUpError::PixelClockUnreachable)?;

        self.sm.set_clock_divider(U24F8::from_bits(divider));
        self.sm.clear_fifos();
        self.sm.set_enable(true);
        Ok(())
    }

    async fn emit_line(&mut self, pixels: &[RawPixel]) {
        self.push_pairs(pixels).await;
    }

    async fn emit_blank(&mut self) {
        for _ in 0..self.width.div_ceil(2) {
            self.sm.tx().wait_push(0).await;
        }
    }
}
