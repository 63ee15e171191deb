//! Peripheral initializer
//!
//! Brings every hardware block from `Uninitialized` to `Ready` (or
//! `Failed`) in a fixed order. A failing block is recorded and passed over;
//! it never stops the blocks after it. The board's [`BringUpPlan`] can retry
//! a step or leave it out entirely.

pub mod board;
pub mod initializer;
pub mod peripheral;
pub mod plan;
pub mod status;

pub use board::Board;
pub use initializer::{initialize_all, initialize_with, BringUp, Handles, InitReport};
pub use peripheral::Peripheral;
pub use plan::{BringUpPlan, RetryPolicy};
pub use status::{InitFailure, InitStatus, PeripheralInitError};
