//! Board-agnostic drivers
//!
//! Written against the `podboard-hal` traits so they run unchanged on the
//! RP2040 and under host tests:
//!
//! - Sensor presence probe for the single-wire temperature/humidity sensor
//! - WS2812 pixel encoding and strip blanking
//! - Heartbeat LED subsystem

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod led;
pub mod sensor;
