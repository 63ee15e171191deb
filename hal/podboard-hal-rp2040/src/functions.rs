//! RP2040 GPIO function-select tables
//!
//! Each GPIO can be muxed to exactly one UART and one SPI signal, fixed in
//! silicon. These tables let bring-up reject a pin map that asks a pin for a
//! function it does not have.

use podboard_core::pins::SpiPins;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// UART signal on a GPIO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartSignal {
    Tx,
    Rx,
    Cts,
    Rts,
}

/// SPI peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiId {
    Spi0,
    Spi1,
}

/// SPI signal on a GPIO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiSignal {
    Rx,
    Csn,
    Sck,
    Tx,
}

/// UART function of `gpio`
///
/// Blocks of four pins alternate UART0/UART1 starting from UART0 at GPIO0,
/// shifted so GPIO 4..=11 land on UART1.
pub const fn uart_function(gpio: u8) -> Option<(UartId, UartSignal)> {
    if gpio >= GPIO_COUNT {
        return None;
    }
    let id = if ((gpio + 4) / 8) % 2 == 0 {
        UartId::Uart0
    } else {
        UartId::Uart1
    };
    let signal = match gpio % 4 {
        0 => UartSignal::Tx,
        1 => UartSignal::Rx,
        2 => UartSignal::Cts,
        _ => UartSignal::Rts,
    };
    Some((id, signal))
}

/// SPI function of `gpio`
pub const fn spi_function(gpio: u8) -> Option<(SpiId, SpiSignal)> {
    if gpio >= GPIO_COUNT {
        return None;
    }
    let id = if (gpio / 8) % 2 == 0 {
        SpiId::Spi0
    } else {
        SpiId::Spi1
    };
    let signal = match gpio % 4 {
        0 => SpiSignal::Rx,
        1 => SpiSignal::Csn,
        2 => SpiSignal::Sck,
        _ => SpiSignal::Tx,
    };
    Some((id, signal))
}

/// Every GPIO can be driven by either PIO block
pub const fn is_pio_capable(gpio: u8) -> bool {
    gpio < GPIO_COUNT
}

/// UART instance serving a TX/RX pair, if both pins belong to the same one
pub fn uart_for_pins(tx: u8, rx: u8) -> Option<UartId> {
    match (uart_function(tx)?, uart_function(rx)?) {
        ((tx_id, UartSignal::Tx), (rx_id, UartSignal::Rx)) if tx_id == rx_id => Some(tx_id),
        _ => None,
    }
}

/// SPI instance serving the host link pins, if all four agree
///
/// Chip select is driven as a plain GPIO, so only RX, SCK and TX need the
/// SPI function; CS just has to be a valid GPIO.
pub fn spi_for_pins(pins: &SpiPins) -> Option<SpiId> {
    let (rx_id, rx) = spi_function(pins.rx.pin())?;
    let (sck_id, sck) = spi_function(pins.sck.pin())?;
    let (tx_id, tx) = spi_function(pins.tx.pin())?;
    if pins.cs.pin() >= GPIO_COUNT {
        return None;
    }

    let signals_ok = rx == SpiSignal::Rx && sck == SpiSignal::Sck && tx == SpiSignal::Tx;
    if signals_ok && rx_id == sck_id && sck_id == tx_id {
        Some(rx_id)
    } else {
        None
    }
}
