//! Cooperative main dispatcher
//!
//! Boots the board once, then polls registered subsystems round-robin on a
//! single thread, timing each poll against a budget.

mod dispatcher;
mod subsystem;

pub use dispatcher::{
    DispatchConfig, DispatchError, Dispatcher, DispatcherState, PollStats, RoundSummary,
    SubsystemId, MAX_SUBSYSTEMS,
};
pub use subsystem::{PollResult, Subsystem};
