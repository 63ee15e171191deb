//! GPS UART handle

use embassy_rp::uart::{self, Blocking, Uart};
use podboard_hal::uart::{drain, DataBits, Parity, StopBits, UartConfig};
use podboard_hal::{UartRx, UartTx};

/// Translate a line configuration into the embassy-rp form
pub fn to_embassy_config(config: &UartConfig) -> uart::Config {
    let mut cfg = uart::Config::default();
    cfg.baudrate = config.baudrate;
    cfg.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    cfg.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    cfg.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    cfg
}

/// Check that `baudrate` is reachable from the peripheral clock
///
/// The PL011 needs at least 16 peripheral clocks per bit.
pub fn baudrate_supported(baudrate: u32, clk_peri_hz: u32) -> bool {
    baudrate != 0 && baudrate <= clk_peri_hz / 16
}

/// UART to the GPS receiver
///
/// Writes block on the TX FIFO; reads only drain what the RX FIFO holds.
pub struct GpsUart<'d> {
    uart: Uart<'d, Blocking>,
}

impl<'d> GpsUart<'d> {
    pub fn new(uart: Uart<'d, Blocking>) -> Self {
        Self { uart }
    }
}

impl UartTx for GpsUart<'_> {
    type Error = uart::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.uart.blocking_write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.uart.blocking_flush()
    }
}

impl UartRx for GpsUart<'_> {
    type Error = uart::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        use embedded_hal_nb::serial::Read;
        drain(buf, || Read::read(&mut self.uart))
    }
}
