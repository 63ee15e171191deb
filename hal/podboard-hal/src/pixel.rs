//! Serial pixel stream
//!
//! Addressable LED strips take one word per pixel, shifted out by dedicated
//! timing hardware (PIO on the RP2040).

/// Sink accepting pre-encoded pixel words
pub trait PixelSink {
    /// Error type for push operations
    type Error;

    /// Queue one encoded pixel word
    ///
    /// Implementations must give up after a bounded wait when the hardware
    /// FIFO stays full.
    fn push_word(&mut self, word: u32) -> Result<(), Self::Error>;
}
