//! Board bring-up capability
//!
//! A board implementation knows how to configure each hardware block on its
//! chip. The initializer decides when each step runs and what happens when it
//! fails; the board only does the work.

use super::status::InitFailure;
use crate::console::Console;
use crate::pins::{PinBinding, SpiPins, UartPins};

/// Per-peripheral bring-up steps for one board
///
/// Each method is called at most once per [`super::initialize_all`] run and
/// must return within a bounded time: waits on hardware readiness go through
/// [`crate::time::poll_until`].
pub trait Board {
    /// Debug console sink
    type Console: Console;
    /// Status LED output
    type StatusLed;
    /// GPS receiver UART
    type GpsUart;
    /// Sensor data line
    type SensorBus;
    /// Host SPI link
    type HostSpi;
    /// LED strip driver
    type LedStrip;

    /// Bring up the debug console
    fn init_console(&mut self) -> Result<Self::Console, InitFailure>;

    /// Configure the status LED as an output, initially off
    fn init_status_led(&mut self, led: PinBinding) -> Result<Self::StatusLed, InitFailure>;

    /// Configure the GPS UART on its TX/RX pair
    fn init_gps_uart(&mut self, pins: UartPins) -> Result<Self::GpsUart, InitFailure>;

    /// Configure the sensor data line and check something answers on it
    fn init_sensor_bus(&mut self, data: PinBinding) -> Result<Self::SensorBus, InitFailure>;

    /// Configure the SPI link to the host
    fn init_host_spi(&mut self, pins: SpiPins) -> Result<Self::HostSpi, InitFailure>;

    /// Load the strip program and leave every pixel dark
    fn init_led_strip(&mut self, data: PinBinding) -> Result<Self::LedStrip, InitFailure>;
}
