//! PIO-driven WS2812 strip
//!
//! One state machine shifts 24-bit GRB words out of its TX FIFO using the
//! side-set pin for the data line. The CPU only pushes words.

use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, PioPin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use embassy_rp::Peri;
use fixed::types::U24F8;
use podboard_core::time::poll_until;
use podboard_core::Clock;
use podboard_hal::PixelSink;

use crate::pio::{
    calc_clock_divider, divider_bits, ClockError, BITS_PER_PIXEL, BIT_RATE_HZ, CYCLES_PER_BIT,
};

/// Longest wait for FIFO space before a push gives up
///
/// Eight-deep joined FIFO at 30 us per pixel drains in well under this.
pub const PUSH_TIMEOUT_US: u64 = 500;

/// The state machine stopped taking words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoStalled;

/// WS2812 strip on one PIO state machine
pub struct PioStrip<'d, PIO: Instance, const SM: usize, C> {
    sm: StateMachine<'d, PIO, SM>,
    clock: C,
    len: usize,
}

impl<'d, PIO: Instance, const SM: usize, C: Clock> PioStrip<'d, PIO, SM, C> {
    /// Load the WS2812 program and start the state machine
    ///
    /// # Arguments
    /// * `common` - PIO common resources (for loading program)
    /// * `sm` - State machine to use
    /// * `data_pin` - Strip data line
    /// * `sys_clk_hz` - Current system clock, for the divider
    /// * `len` - Pixels on the strip
    pub fn new<P: PioPin>(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        data_pin: Peri<'d, P>,
        clock: C,
        sys_clk_hz: u32,
        len: usize,
    ) -> Result<Self, ClockError> {
        let (int_div, frac_div) = calc_clock_divider(sys_clk_hz, BIT_RATE_HZ, CYCLES_PER_BIT)?;

        // Delays are T3-1, T1-1, T2-1 and T2-1 cycles
        let prg = pio::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "bitloop:",
            "    out x, 1        side 0 [2]",
            "    jmp !x do_zero  side 1 [1]",
            "do_one:",
            "    jmp bitloop     side 1 [4]",
            "do_zero:",
            "    nop             side 0 [4]",
            ".wrap"
        );

        let installed = common.load_program(&prg.program);
        let out_pin = common.make_pio_pin(data_pin);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&out_pin]);
        cfg.clock_divider = U24F8::from_bits(divider_bits(int_div, frac_div));
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: BITS_PER_PIXEL,
            direction: ShiftDirection::Left,
        };

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::Out, &[&out_pin]);
        sm.set_enable(true);

        Ok(Self { sm, clock, len })
    }

    /// Pixels on the strip
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<PIO: Instance, const SM: usize, C: Clock> PixelSink for PioStrip<'_, PIO, SM, C> {
    type Error = FifoStalled;

    fn push_word(&mut self, word: u32) -> Result<(), Self::Error> {
        let sm = &mut self.sm;
        poll_until(&self.clock, PUSH_TIMEOUT_US, || sm.tx().try_push(word))
            .map(|_| ())
            .map_err(|_| FifoStalled)
    }
}
