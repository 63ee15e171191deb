//! UART serial abstractions
//!
//! Used for the GPS receiver link. Writes block on the hardware FIFO only;
//! reads never wait for bytes that have not arrived yet.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Queue bytes for transmission
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until every queued byte has left the shift register
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read whatever is available into `buf`, returning the byte count
    ///
    /// Returns `Ok(0)` when nothing has been received.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Fill `buf` from a non-blocking byte source until it reports `WouldBlock`
///
/// An error after some bytes were stored returns the bytes instead; the
/// source reports it again on the next call if it persists.
pub fn drain<E>(
    buf: &mut [u8],
    mut next: impl FnMut() -> nb::Result<u8, E>,
) -> Result<usize, E> {
    let mut count = 0;
    for slot in buf.iter_mut() {
        match next() {
            Ok(byte) => {
                *slot = byte;
                count += 1;
            }
            Err(nb::Error::WouldBlock) => break,
            Err(nb::Error::Other(_)) if count > 0 => break,
            Err(nb::Error::Other(e)) => return Err(e),
        }
    }
    Ok(count)
}

/// UART line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits per frame
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::NMEA
    }
}

impl UartConfig {
    /// 9600 8N1, the power-on default of most NMEA GPS modules
    pub const NMEA: Self = Self {
        baudrate: 9600,
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
    };

    /// Same framing at a different baud rate
    pub const fn with_baudrate(self, baudrate: u32) -> Self {
        Self { baudrate, ..self }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bytes already in the FIFO, then an optional error, then nothing
    struct Fifo<'a> {
        bytes: &'a [u8],
        error: Option<&'static str>,
        reads: usize,
    }

    impl<'a> Fifo<'a> {
        fn new(bytes: &'a [u8]) -> Self {
            Self {
                bytes,
                error: None,
                reads: 0,
            }
        }

        fn next(&mut self) -> nb::Result<u8, &'static str> {
            self.reads += 1;
            if let Some((first, rest)) = self.bytes.split_first() {
                self.bytes = rest;
                return Ok(*first);
            }
            match self.error.take() {
                Some(e) => Err(nb::Error::Other(e)),
                None => Err(nb::Error::WouldBlock),
            }
        }
    }

    #[test]
    fn test_drain_silent_line_returns_zero() {
        let mut fifo = Fifo::new(&[]);
        let mut buf = [0u8; 82];
        assert_eq!(drain(&mut buf, || fifo.next()), Ok(0));
        assert_eq!(fifo.reads, 1);
    }

    #[test]
    fn test_drain_stops_at_empty_fifo() {
        let mut fifo = Fifo::new(b"$GP");
        let mut buf = [0u8; 82];
        assert_eq!(drain(&mut buf, || fifo.next()), Ok(3));
        assert_eq!(&buf[..3], b"$GP");
    }

    #[test]
    fn test_drain_stops_at_full_buffer() {
        let mut fifo = Fifo::new(b"$GPGGA");
        let mut buf = [0u8; 4];
        assert_eq!(drain(&mut buf, || fifo.next()), Ok(4));
        assert_eq!(&buf, b"$GPG");
        assert_eq!(fifo.bytes, b"GA");
    }

    #[test]
    fn test_drain_error_after_bytes_keeps_bytes() {
        let mut fifo = Fifo::new(b"$G");
        fifo.error = Some("overrun");
        let mut buf = [0u8; 8];
        assert_eq!(drain(&mut buf, || fifo.next()), Ok(2));
    }

    #[test]
    fn test_drain_error_first_is_reported() {
        let mut fifo = Fifo::new(&[]);
        fifo.error = Some("framing");
        let mut buf = [0u8; 8];
        assert_eq!(drain(&mut buf, || fifo.next()), Err("framing"));
    }
}
