//! Presence check for DHT-class single-wire sensors
//!
//! The host pulls the idle-high line low for at least a millisecond, lets go,
//! and a live sensor answers by holding the line low for ~80 us and then
//! releasing it. Only the handshake is checked; the data frame that follows
//! is left to the sensor driver.

use core::fmt;

use podboard_core::time::{busy_wait_us, poll_until};
use podboard_core::{Clock, InitFailure};
use podboard_hal::OpenDrainLine;

/// Handshake timing limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeTiming {
    /// How long the line may take to float high after release
    pub idle_timeout_us: u64,
    /// Host start pulse length
    pub start_pulse_us: u64,
    /// How long the sensor may take to start its acknowledge
    pub response_timeout_us: u64,
    /// Longest acknowledge low phase accepted
    pub ack_max_us: u64,
}

impl Default for ProbeTiming {
    fn default() -> Self {
        Self {
            idle_timeout_us: 1_000,
            start_pulse_us: 1_100,
            response_timeout_us: 200,
            ack_max_us: 200,
        }
    }
}

/// Handshake failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeError {
    /// Line never went high: shorted, or no pull-up
    StuckLow,
    /// Nothing pulled the line low after the start pulse
    NoAck,
    /// Line stayed low past the acknowledge window
    AckTooLong,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::StuckLow => f.write_str("line stuck low"),
            ProbeError::NoAck => f.write_str("no acknowledge"),
            ProbeError::AckTooLong => f.write_str("acknowledge too long"),
        }
    }
}

impl From<ProbeError> for InitFailure {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::StuckLow => InitFailure::DeviceNotPresent,
            ProbeError::NoAck | ProbeError::AckTooLong => InitFailure::BusTimeout,
        }
    }
}

/// Run the start/acknowledge handshake
///
/// Every wait is bounded by `timing`. The line is always released on return.
pub fn probe<L, C>(line: &mut L, clock: &C, timing: &ProbeTiming) -> Result<(), ProbeError>
where
    L: OpenDrainLine,
    C: Clock + ?Sized,
{
    line.release();
    poll_until(clock, timing.idle_timeout_us, || line.is_high())
        .map_err(|_| ProbeError::StuckLow)?;

    line.drive_low();
    busy_wait_us(clock, timing.start_pulse_us);
    line.release();

    poll_until(clock, timing.response_timeout_us, || line.is_low())
        .map_err(|_| ProbeError::NoAck)?;
    poll_until(clock, timing.ack_max_us, || line.is_high())
        .map_err(|_| ProbeError::AckTooLong)?;

    Ok(())
}
