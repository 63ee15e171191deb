//! Podboard Hardware Abstraction Layer
//!
//! Traits implemented by chip-specific HALs and consumed by the board-agnostic
//! drivers and core. Every peripheral handle produced during bring-up is one of
//! these capabilities, so the sequencing logic never touches registers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  podboard-firmware                      │
//! └─────────────────────────────────────────┘
//!          │                     │
//!          ▼                     ▼
//! ┌─────────────────┐   ┌─────────────────┐
//! │ podboard-core / │   │ podboard-hal-   │
//! │ podboard-drivers│   │    rp2040       │
//! └─────────────────┘   └─────────────────┘
//!          │                     │
//!          └──────────┬──────────┘
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  podboard-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::OpenDrainLine`] - Digital I/O
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`spi::SpiBus`] - SPI bus operations
//! - [`pixel::PixelSink`] - Serial pixel stream (addressable LED strips)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod pixel;
pub mod spi;
pub mod uart;

pub use gpio::{OpenDrainLine, OutputPin};
pub use pixel::PixelSink;
pub use spi::SpiBus;
pub use uart::{UartRx, UartTx};
