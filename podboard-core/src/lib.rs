//! Board-agnostic core logic for the pod sensor-board firmware
//!
//! Nothing in here touches registers; the chip-specific side plugs in through
//! the [`init::Board`] trait and the [`time::Clock`] / [`console::Console`]
//! capabilities:
//!
//! - Pin map: logical role to GPIO bindings, validated at compile time
//! - Peripheral initializer: ordered, failure-isolated bring-up with per-step
//!   retries and a compile-time skip set
//! - Boot context and one-shot boot latch
//! - Cooperative dispatcher with poll-budget enforcement

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod boot;
pub mod console;
pub mod dispatch;
pub mod init;
pub mod pins;
pub mod time;

#[cfg(test)]
pub(crate) mod sim;

pub use boot::{BootContext, BootLatch, BootToken};
pub use console::Console;
pub use dispatch::{
    DispatchConfig, DispatchError, Dispatcher, DispatcherState, PollResult, Subsystem,
};
pub use init::{
    initialize_all, initialize_with, Board, BringUpPlan, InitFailure, InitReport, InitStatus,
    Peripheral, RetryPolicy,
};
pub use pins::{PinBinding, PinMap, Role};
pub use time::Clock;
