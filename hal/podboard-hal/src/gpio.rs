//! GPIO pin abstractions
//!
//! Push-pull outputs (status LED, chip selects) and the open-drain style
//! single data line used by One-Wire-type sensors.

/// Digital push-pull output
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;

    /// Drive the pin to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Invert the current output level
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }
}

/// Bidirectional single-wire data line with an external or internal pull-up
///
/// The host only ever pulls the line low or lets go of it; the pull-up (or the
/// attached device) determines the level otherwise.
pub trait OpenDrainLine {
    /// Actively pull the line low
    fn drive_low(&mut self);

    /// Stop driving; the line floats to the pull-up unless a device holds it
    fn release(&mut self);

    /// Sample the current line level
    fn is_high(&self) -> bool;

    /// Sample the current line level, inverted
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
