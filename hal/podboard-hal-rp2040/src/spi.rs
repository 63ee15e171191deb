//! Host SPI handle

use embedded_hal::digital::OutputPin as HalOutputPin;
use embedded_hal::spi::SpiBus as HalSpiBus;
use embassy_rp::spi;
use podboard_hal::spi::{Phase, Polarity, SpiConfig};
use podboard_hal::SpiBus;

/// Translate a bus configuration into the embassy-rp form
pub fn to_embassy_config(config: &SpiConfig) -> spi::Config {
    let mut cfg = spi::Config::default();
    cfg.frequency = config.frequency;
    cfg.polarity = match config.mode.polarity() {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    cfg.phase = match config.mode.phase() {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    cfg
}

/// SPI link to the host, chip select driven in software
///
/// CS is asserted (low) for the length of each call.
pub struct HostSpi<B, CS> {
    bus: B,
    cs: CS,
}

impl<B: HalSpiBus<u8>, CS: HalOutputPin> HostSpi<B, CS> {
    /// Wrap `bus`, leaving CS deasserted
    ///
    /// `bus` must already be configured; see [`to_embassy_config`].
    pub fn new(bus: B, mut cs: CS) -> Self {
        let _ = cs.set_high();
        Self { bus, cs }
    }

    fn framed<R>(
        &mut self,
        op: impl FnOnce(&mut B) -> Result<R, B::Error>,
    ) -> Result<R, B::Error> {
        let _ = self.cs.set_low();
        let result = op(&mut self.bus).and_then(|r| self.bus.flush().map(|_| r));
        let _ = self.cs.set_high();
        result
    }
}

impl<B: HalSpiBus<u8>, CS: HalOutputPin> SpiBus for HostSpi<B, CS> {
    type Error = B::Error;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.framed(|bus| bus.transfer(read, write))
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.framed(|bus| bus.write(data))
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        self.framed(|bus| bus.transfer_in_place(data))
    }
}
