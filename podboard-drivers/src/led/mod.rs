//! Status LED and addressable strip

mod heartbeat;
mod ws2812;

pub use heartbeat::Heartbeat;
pub use ws2812::{blank, write_pixels, Rgb};
