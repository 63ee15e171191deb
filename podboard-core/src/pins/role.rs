//! Logical pin roles and the bus each one belongs to

use core::fmt;

/// Logical function of a board pin
///
/// The discriminant doubles as the row index inside [`super::PinMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// On-board status LED
    Led,
    /// GPS receiver UART, MCU transmit
    GpsTx,
    /// GPS receiver UART, MCU receive
    GpsRx,
    /// Temperature/humidity sensor data line
    SensorSda,
    /// Host SPI link, MCU receive
    SpiRx,
    /// Host SPI link, chip select
    SpiCs,
    /// Host SPI link, clock
    SpiSck,
    /// Host SPI link, MCU transmit
    SpiTx,
    /// Addressable LED strip data, driven by PIO
    LedStripPio,
}

/// Hardware block a pin is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusRole {
    Gpio,
    Uart,
    /// I2C-class single data line (One-Wire style sensors)
    I2c,
    Spi,
    Pio,
}

impl Role {
    /// Number of roles
    pub const COUNT: usize = 9;

    /// Every role, in pin-map row order
    pub const ALL: [Role; Role::COUNT] = [
        Role::Led,
        Role::GpsTx,
        Role::GpsRx,
        Role::SensorSda,
        Role::SpiRx,
        Role::SpiCs,
        Role::SpiSck,
        Role::SpiTx,
        Role::LedStripPio,
    ];

    /// Row index inside the pin map
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bus this role is routed to
    pub const fn bus(self) -> BusRole {
        match self {
            Role::Led => BusRole::Gpio,
            Role::GpsTx | Role::GpsRx => BusRole::Uart,
            Role::SensorSda => BusRole::I2c,
            Role::SpiRx | Role::SpiCs | Role::SpiSck | Role::SpiTx => BusRole::Spi,
            Role::LedStripPio => BusRole::Pio,
        }
    }

    /// Short name used in console output
    pub const fn name(self) -> &'static str {
        match self {
            Role::Led => "led",
            Role::GpsTx => "gps-tx",
            Role::GpsRx => "gps-rx",
            Role::SensorSda => "sensor-sda",
            Role::SpiRx => "spi-rx",
            Role::SpiCs => "spi-cs",
            Role::SpiSck => "spi-sck",
            Role::SpiTx => "spi-tx",
            Role::LedStripPio => "led-strip",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
