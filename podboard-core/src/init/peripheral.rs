//! Hardware blocks brought up at boot

use core::fmt;

use crate::pins::Role;

/// Hardware block owned by one handle after bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    /// Human-readable diagnostics stream
    DebugConsole,
    /// On-board status LED output
    StatusLed,
    /// GPS receiver UART
    GpsUart,
    /// Temperature/humidity sensor data line
    SensorBus,
    /// SPI link to the host computer
    HostSpi,
    /// PIO-driven addressable LED strip
    LedStrip,
}

impl Peripheral {
    /// Number of peripherals
    pub const COUNT: usize = 6;

    /// Bring-up order: console first so later steps can log, then plain GPIO,
    /// then buses by increasing complexity
    pub const BRING_UP_ORDER: [Peripheral; Peripheral::COUNT] = [
        Peripheral::DebugConsole,
        Peripheral::StatusLed,
        Peripheral::GpsUart,
        Peripheral::SensorBus,
        Peripheral::HostSpi,
        Peripheral::LedStrip,
    ];

    /// Slot index in status tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Pin roles claimed by this block
    pub const fn roles(self) -> &'static [Role] {
        match self {
            Peripheral::DebugConsole => &[],
            Peripheral::StatusLed => &[Role::Led],
            Peripheral::GpsUart => &[Role::GpsTx, Role::GpsRx],
            Peripheral::SensorBus => &[Role::SensorSda],
            Peripheral::HostSpi => &[Role::SpiRx, Role::SpiCs, Role::SpiSck, Role::SpiTx],
            Peripheral::LedStrip => &[Role::LedStripPio],
        }
    }

    /// Short name used in console output
    pub const fn name(self) -> &'static str {
        match self {
            Peripheral::DebugConsole => "console",
            Peripheral::StatusLed => "status-led",
            Peripheral::GpsUart => "gps-uart",
            Peripheral::SensorBus => "sensor-bus",
            Peripheral::HostSpi => "host-spi",
            Peripheral::LedStrip => "led-strip",
        }
    }
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
