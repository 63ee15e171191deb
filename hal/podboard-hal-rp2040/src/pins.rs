//! Plain GPIOs handed out by number
//!
//! Pins that only ever act as GPIO (status LED, sensor line) are not tied to
//! a peripheral instance, so the board can take them by the number in the pin
//! map. Pins wired to UART/SPI/PIO stay as concrete types in the board and
//! never enter the bank.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

use crate::functions::GPIO_COUNT;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin never deposited, or already taken
    Unavailable,
}

/// GPIOs available for assignment by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

impl Default for PinBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PinBank {
    /// Empty bank
    pub fn new() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT as usize],
        }
    }

    /// Deposit a pin under its GPIO number
    pub fn insert(&mut self, gpio: u8, pin: Peri<'static, AnyPin>) -> Result<(), PinError> {
        let slot = self
            .pins
            .get_mut(gpio as usize)
            .ok_or(PinError::InvalidPin)?;
        *slot = Some(pin);
        Ok(())
    }

    /// Take a pin by number
    pub fn take(&mut self, gpio: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(gpio as usize)
            .ok_or(PinError::InvalidPin)?
            .take()
            .ok_or(PinError::Unavailable)
    }
}
