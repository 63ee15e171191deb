//! Liveness blink on the status LED

use podboard_core::{Clock, PollResult, Subsystem};
use podboard_hal::OutputPin;

/// Toggles the status LED every half period
///
/// A steady blink means the dispatcher is still cycling.
pub struct Heartbeat<P, C> {
    led: P,
    clock: C,
    half_period_us: u64,
    next_toggle_us: u64,
}

impl<P: OutputPin, C: Clock> Heartbeat<P, C> {
    /// Default full blink period
    pub const DEFAULT_PERIOD_US: u64 = 1_000_000;

    /// Start with the LED off; the first toggle is half a period away
    pub fn new(mut led: P, clock: C, period_us: u64) -> Self {
        led.set_low();
        let half_period_us = (period_us / 2).max(1);
        let next_toggle_us = clock.now_us().saturating_add(half_period_us);
        Self {
            led,
            clock,
            half_period_us,
            next_toggle_us,
        }
    }

    /// Check if the LED is currently lit
    pub fn is_lit(&self) -> bool {
        self.led.is_set_high()
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.led
    }
}

impl<P: OutputPin, C: Clock> Subsystem for Heartbeat<P, C> {
    fn name(&self) -> &'static str {
        "heartbeat"
    }

    fn poll_once(&mut self) -> PollResult {
        let now = self.clock.now_us();
        if now < self.next_toggle_us {
            return PollResult::Idle;
        }

        self.led.toggle();
        // Skip missed edges instead of toggling several times in a row
        self.next_toggle_us = self.next_toggle_us.saturating_add(self.half_period_us);
        if self.next_toggle_us <= now {
            self.next_toggle_us = now.saturating_add(self.half_period_us);
        }
        PollResult::Progressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
        toggles: u32,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: true,
                toggles: 0,
            }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }

        fn toggle(&mut self) {
            self.toggles += 1;
            self.high = !self.high;
        }
    }

    struct ManualClock {
        now: Cell<u64>,
    }

    impl ManualClock {
        fn at(us: u64) -> Self {
            Self { now: Cell::new(us) }
        }

        fn set(&self, us: u64) {
            self.now.set(us);
        }
    }

    impl Clock for ManualClock {
        fn now_us(&self) -> u64 {
            self.now.get()
        }
    }

    #[test]
    fn test_starts_dark() {
        let clock = ManualClock::at(0);
        let heartbeat = Heartbeat::new(MockPin::new(), &clock, 1_000);
        assert!(!heartbeat.is_lit());
    }

    #[test]
    fn test_toggles_every_half_period() {
        let clock = ManualClock::at(0);
        let mut heartbeat = Heartbeat::new(MockPin::new(), &clock, 1_000);

        clock.set(499);
        assert_eq!(heartbeat.poll_once(), PollResult::Idle);
        assert!(!heartbeat.is_lit());

        clock.set(500);
        assert_eq!(heartbeat.poll_once(), PollResult::Progressed);
        assert!(heartbeat.is_lit());
        assert_eq!(heartbeat.poll_once(), PollResult::Idle);

        clock.set(1_000);
        assert_eq!(heartbeat.poll_once(), PollResult::Progressed);
        assert!(!heartbeat.is_lit());
    }

    #[test]
    fn test_late_poll_toggles_once() {
        let clock = ManualClock::at(0);
        let mut heartbeat = Heartbeat::new(MockPin::new(), &clock, 1_000);

        clock.set(10_000);
        assert_eq!(heartbeat.poll_once(), PollResult::Progressed);
        assert_eq!(heartbeat.poll_once(), PollResult::Idle);

        clock.set(10_500);
        assert_eq!(heartbeat.poll_once(), PollResult::Progressed);
        assert_eq!(heartbeat.release().toggles, 2);
    }

    #[test]
    fn test_name() {
        let clock = ManualClock::at(0);
        let period = Heartbeat::<MockPin, &ManualClock>::DEFAULT_PERIOD_US;
        let heartbeat = Heartbeat::new(MockPin::new(), &clock, period);
        assert_eq!(heartbeat.name(), "heartbeat");
    }
}
