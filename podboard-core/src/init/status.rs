//! Initialization status lifecycle and failure reasons

use core::fmt;

use super::peripheral::Peripheral;

/// Why a peripheral failed to come up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitFailure {
    /// Clock divider or baud rate cannot be reached from the system clock
    ClockConfig,
    /// Pin already claimed, or the resource sits on a different pin than the map says
    PinConflict,
    /// Pin cannot be muxed to the requested hardware function
    PinFunction,
    /// Hardware did not become ready within its bounded wait
    BusTimeout,
    /// Nothing answering on the bus
    DeviceNotPresent,
    /// Hardware resource was already consumed by an earlier bring-up
    ResourceTaken,
}

impl InitFailure {
    /// Reason code used in console output
    pub const fn as_str(self) -> &'static str {
        match self {
            InitFailure::ClockConfig => "clock-config",
            InitFailure::PinConflict => "pin-conflict",
            InitFailure::PinFunction => "pin-function",
            InitFailure::BusTimeout => "timeout",
            InitFailure::DeviceNotPresent => "device-not-present",
            InitFailure::ResourceTaken => "resource-taken",
        }
    }

    /// Check if another attempt could succeed without a hardware change
    pub const fn is_transient(self) -> bool {
        matches!(self, InitFailure::BusTimeout | InitFailure::DeviceNotPresent)
    }
}

impl fmt::Display for InitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-peripheral bring-up state
///
/// `Failed` is terminal until the next hardware reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStatus {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    Failed(InitFailure),
}

impl InitStatus {
    /// Enter `Initializing`; any other state is kept
    pub fn begin(self) -> Self {
        match self {
            InitStatus::Uninitialized => InitStatus::Initializing,
            other => other,
        }
    }

    /// Leave `Initializing` with the step's outcome; any other state is kept
    pub fn complete(self, outcome: Result<(), InitFailure>) -> Self {
        match (self, outcome) {
            (InitStatus::Initializing, Ok(())) => InitStatus::Ready,
            (InitStatus::Initializing, Err(reason)) => InitStatus::Failed(reason),
            (other, _) => other,
        }
    }

    /// Check if the peripheral is usable
    pub fn is_ready(&self) -> bool {
        matches!(self, InitStatus::Ready)
    }

    /// Check if the peripheral failed
    pub fn is_failed(&self) -> bool {
        matches!(self, InitStatus::Failed(_))
    }

    /// Failure reason, if any
    pub fn failure(&self) -> Option<InitFailure> {
        match self {
            InitStatus::Failed(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// A peripheral that did not come up, with the reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeripheralInitError {
    pub peripheral: Peripheral,
    pub reason: InitFailure,
}

impl fmt::Display for PeripheralInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.peripheral, self.reason)
    }
}
