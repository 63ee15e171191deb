//! Monotonic clock from the embassy time driver

use embassy_time::Instant;
use podboard_core::Clock;

/// [`Clock`] over `embassy_time::Instant`
///
/// Needs the `time-driver` feature of `embassy-rp`, which the workspace
/// enables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
