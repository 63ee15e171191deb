//! GPIO handle wrappers

use embassy_rp::gpio::{Flex, Pull};
use embedded_hal::digital::OutputPin as HalOutputPin;
use podboard_hal::{OpenDrainLine, OutputPin};

/// Push-pull output over any `embedded-hal` output pin
///
/// Remembers the last level written, so reading it back never touches the
/// hardware.
pub struct GpioOutput<P> {
    pin: P,
    high: bool,
}

impl<P: HalOutputPin> GpioOutput<P> {
    /// Wrap `pin`, driving it to `high`
    pub fn new(mut pin: P, high: bool) -> Self {
        // RP2040 GPIO writes cannot fail
        let _ = if high { pin.set_high() } else { pin.set_low() };
        Self { pin, high }
    }
}

impl<P: HalOutputPin> OutputPin for GpioOutput<P> {
    fn set_high(&mut self) {
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Single-wire data line over a `Flex` pin
///
/// The output latch is held low; driving means switching to output, releasing
/// means switching back to input with the pull-up on.
pub struct SensorLine<'d> {
    pin: Flex<'d>,
}

impl<'d> SensorLine<'d> {
    /// Take over `pin`, leaving the line released
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.set_low();
        pin.set_pull(Pull::Up);
        pin.set_as_input();
        Self { pin }
    }
}

impl OpenDrainLine for SensorLine<'_> {
    fn drive_low(&mut self) {
        self.pin.set_as_output();
    }

    fn release(&mut self) {
        self.pin.set_as_input();
    }

    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
