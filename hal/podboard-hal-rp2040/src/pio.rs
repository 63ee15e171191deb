//! WS2812 bit timing for the PIO strip driver
//!
//! Each data bit takes `T1 + T2 + T3` PIO cycles: the line is high for `T1`,
//! then high (one) or low (zero) for `T2`, then low for `T3`. Running the
//! state machine at `bit_rate * CYCLES_PER_BIT` gives the 1.25 us bit period
//! the LEDs expect at 800 kHz.

use core::fmt;

use podboard_core::InitFailure;

/// Cycles the line is high at the start of every bit
pub const T1: u32 = 2;
/// Cycles that carry the bit value
pub const T2: u32 = 5;
/// Cycles the line is low at the end of every bit
pub const T3: u32 = 3;
/// PIO cycles per WS2812 bit
pub const CYCLES_PER_BIT: u32 = T1 + T2 + T3;

/// WS2812 data rate
pub const BIT_RATE_HZ: u32 = 800_000;

/// Colour bits per pixel (GRB)
pub const BITS_PER_PIXEL: u8 = 24;

/// The requested timing cannot be produced from the system clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Bit rate or cycle count of zero
    ZeroRate,
    /// Would need a divider below 1.0
    TooFast,
    /// Would need a divider above 65535
    TooSlow,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::ZeroRate => f.write_str("zero bit rate"),
            ClockError::TooFast => f.write_str("divider below 1.0"),
            ClockError::TooSlow => f.write_str("divider above 65535"),
        }
    }
}

impl From<ClockError> for InitFailure {
    fn from(_: ClockError) -> Self {
        InitFailure::ClockConfig
    }
}

/// Calculate the PIO clock divider for a bit rate
///
/// The state machine runs at `sys_clk_hz / divider` and spends
/// `cycles_per_bit` cycles on each bit, so
/// `divider = sys_clk_hz / (bit_rate_hz * cycles_per_bit)`.
///
/// Returns (integer_part, fractional_part) for the 16.8 fixed-point divider.
pub fn calc_clock_divider(
    sys_clk_hz: u32,
    bit_rate_hz: u32,
    cycles_per_bit: u32,
) -> Result<(u16, u8), ClockError> {
    let cycle_rate = bit_rate_hz as u64 * cycles_per_bit as u64;
    if cycle_rate == 0 {
        return Err(ClockError::ZeroRate);
    }

    // To get 8-bit fractional precision, multiply by 256 first
    let divider_x256 = (sys_clk_hz as u64 * 256) / cycle_rate;
    if divider_x256 < 256 {
        return Err(ClockError::TooFast);
    }
    if divider_x256 > 0xFFFF_FF {
        return Err(ClockError::TooSlow);
    }

    Ok(((divider_x256 >> 8) as u16, (divider_x256 & 0xFF) as u8))
}

/// Divider as the raw bits of a `U24F8`
pub const fn divider_bits(int_part: u16, frac_part: u8) -> u32 {
    ((int_part as u32) << 8) | (frac_part as u32)
}
