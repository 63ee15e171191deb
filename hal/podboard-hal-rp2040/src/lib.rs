//! RP2040-specific HAL for the pod sensor board
//!
//! Implements the `podboard-hal` traits on top of `embassy-rp`, plus the
//! chip facts the board's bring-up checks against:
//!
//! - Pin-function tables (which GPIO can carry which UART/SPI signal)
//! - Pin bank for handing out plain GPIOs by number
//! - Microsecond clock backed by the embassy time driver
//! - GPIO output, open-drain sensor line, GPS UART and host SPI wrappers
//! - PIO WS2812 strip driver

#![no_std]

pub mod clock;
pub mod functions;
pub mod gpio;
pub mod pins;
pub mod pio;
pub mod spi;
pub mod strip;
pub mod uart;

pub use clock::EmbassyClock;
pub use functions::{spi_for_pins, uart_for_pins, SpiId, UartId};
pub use pins::{PinBank, PinError};
