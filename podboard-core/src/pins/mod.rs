//! Pin map
//!
//! Compile-time table binding every logical role on the board to exactly one
//! GPIO. Board revisions supply their own constant map.

pub mod map;
pub mod role;

pub use map::{PinBinding, PinMap, PinMapError, SpiPins, UartPins, MAX_BOARD_GPIO};
pub use role::{BusRole, Role};
