//! Unit of cooperative work

/// Outcome of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollResult {
    /// Nothing to do this round
    Idle,
    /// Some work was done
    Progressed,
}

/// Work the dispatcher polls once per round
///
/// `poll_once` must return promptly: no blocking, no unbounded loops. Waits
/// are split across polls or bounded with [`crate::time::poll_until`].
pub trait Subsystem {
    /// Short name used in console output
    fn name(&self) -> &'static str;

    /// Do at most one bounded slice of work
    fn poll_once(&mut self) -> PollResult;
}
