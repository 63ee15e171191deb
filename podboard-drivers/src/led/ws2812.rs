//! WS2812 pixel words
//!
//! The strip expects green, red, blue, most significant bit first. Words are
//! left-aligned so a 24-bit autopull shifter sends exactly the colour bits.

use podboard_hal::PixelSink;

/// 8-bit-per-channel colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// GRB word in bits 31..8
    pub const fn to_word(self) -> u32 {
        ((self.g as u32) << 24) | ((self.r as u32) << 16) | ((self.b as u32) << 8)
    }
}

/// Send one word per pixel, stopping at the first sink error
pub fn write_pixels<S, I>(sink: &mut S, pixels: I) -> Result<(), S::Error>
where
    S: PixelSink,
    I: IntoIterator<Item = Rgb>,
{
    for pixel in pixels {
        sink.push_word(pixel.to_word())?;
    }
    Ok(())
}

/// Turn off the first `len` pixels
pub fn blank<S: PixelSink>(sink: &mut S, len: usize) -> Result<(), S::Error> {
    write_pixels(sink, core::iter::repeat(Rgb::OFF).take(len))
}
