//! Per-step bring-up policy: retries and skipped peripherals

use super::peripheral::Peripheral;

/// How often a step is attempted before it is marked `Failed`
///
/// Only transient failures (see [`InitFailure::is_transient`]) are retried;
/// a wiring or clock problem fails on the first attempt.
///
/// [`InitFailure::is_transient`]: crate::init::InitFailure::is_transient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Total attempts, the first included; 0 behaves like 1
    pub attempts: u8,
    /// Wait between attempts
    pub backoff_us: u64,
}

impl RetryPolicy {
    /// Single attempt
    pub const ONCE: Self = Self {
        attempts: 1,
        backoff_us: 0,
    };

    /// Attempts actually made for a step that keeps failing
    pub const fn max_attempts(&self) -> u8 {
        if self.attempts == 0 {
            1
        } else {
            self.attempts
        }
    }

    /// Longest time spent waiting between attempts
    pub const fn max_backoff_us(&self) -> u64 {
        (self.max_attempts() as u64 - 1) * self.backoff_us
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::ONCE
    }
}

/// Which steps run and how often
///
/// Built as a `const` by the board so the skip set is fixed at compile time.
/// A skipped peripheral's step is never called and it stays `Uninitialized`.
///
/// ```
/// use podboard_core::init::{BringUpPlan, Peripheral, RetryPolicy};
///
/// const PLAN: BringUpPlan = BringUpPlan::new()
///     .skip(Peripheral::LedStrip)
///     .retry(Peripheral::SensorBus, RetryPolicy { attempts: 8, backoff_us: 250_000 });
///
/// assert!(PLAN.is_skipped(Peripheral::LedStrip));
/// assert_eq!(PLAN.retry_policy(Peripheral::SensorBus).attempts, 8);
/// assert_eq!(PLAN.retry_policy(Peripheral::GpsUart), RetryPolicy::ONCE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringUpPlan {
    skipped: [bool; Peripheral::COUNT],
    retry: [RetryPolicy; Peripheral::COUNT],
}

impl Default for BringUpPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl BringUpPlan {
    /// Every step runs once
    pub const fn new() -> Self {
        Self {
            skipped: [false; Peripheral::COUNT],
            retry: [RetryPolicy::ONCE; Peripheral::COUNT],
        }
    }

    /// Never bring up `peripheral`
    pub const fn skip(mut self, peripheral: Peripheral) -> Self {
        self.skipped[peripheral.index()] = true;
        self
    }

    /// Retry transient failures of `peripheral` under `policy`
    pub const fn retry(mut self, peripheral: Peripheral, policy: RetryPolicy) -> Self {
        self.retry[peripheral.index()] = policy;
        self
    }

    pub const fn is_skipped(&self, peripheral: Peripheral) -> bool {
        self.skipped[peripheral.index()]
    }

    pub const fn retry_policy(&self, peripheral: Peripheral) -> RetryPolicy {
        self.retry[peripheral.index()]
    }
}
