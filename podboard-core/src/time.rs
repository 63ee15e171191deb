//! Monotonic time and bounded waiting
//!
//! Every wait on hardware goes through [`poll_until`], which gives up after a
//! fixed number of microseconds instead of spinning forever.

use core::fmt;

/// Monotonic microsecond clock
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin
    fn now_us(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// A bounded wait ran out of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedOut {
    /// How long the wait lasted
    pub waited_us: u64,
}

impl fmt::Display for TimedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timed out after {} us", self.waited_us)
    }
}

/// Poll `ready` until it returns true or `timeout_us` elapses
///
/// Returns the elapsed microseconds on success. `ready` is always checked at
/// least once, so a zero timeout still observes an already-ready condition.
pub fn poll_until<C, F>(clock: &C, timeout_us: u64, mut ready: F) -> Result<u64, TimedOut>
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    let start = clock.now_us();
    loop {
        let elapsed = clock.now_us().saturating_sub(start);
        if ready() {
            return Ok(elapsed);
        }
        if elapsed >= timeout_us {
            return Err(TimedOut { waited_us: elapsed });
        }
        core::hint::spin_loop();
    }
}

/// Spin for at least `us` microseconds
pub fn busy_wait_us<C: Clock + ?Sized>(clock: &C, us: u64) {
    let start = clock.now_us();
    while clock.now_us().saturating_sub(start) < us {
        core::hint::spin_loop();
    }
}
