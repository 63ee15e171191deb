//! One-shot boot latch and the context handed out after bring-up

use portable_atomic::{AtomicBool, Ordering};

use crate::init::{Board, BringUp, Handles, InitReport};
use crate::pins::PinMap;

/// Guards the single bring-up allowed per hardware reset
///
/// Keep one in a `static`; only the first [`BootLatch::acquire`] succeeds.
pub struct BootLatch {
    booted: AtomicBool,
}

impl Default for BootLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl BootLatch {
    pub const fn new() -> Self {
        Self {
            booted: AtomicBool::new(false),
        }
    }

    /// Take the boot token; `None` once it has been handed out
    pub fn acquire(&self) -> Option<BootToken> {
        if self.booted.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(BootToken { _private: () })
        }
    }

    /// Check if the token has been handed out
    pub fn is_booted(&self) -> bool {
        self.booted.load(Ordering::Acquire)
    }
}

/// Permission to run bring-up once
///
/// Only [`BootLatch::acquire`] creates one; [`crate::Dispatcher::boot`]
/// consumes it.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootToken {
    _private: (),
}

/// Pin map, Ready handles and bring-up report, passed from boot to whoever
/// builds the subsystems
///
/// Each handle can be taken once.
pub struct BootContext<'p, B: Board> {
    pins: &'p PinMap,
    handles: Handles<B>,
    report: InitReport,
}

impl<'p, B: Board> BootContext<'p, B> {
    pub(crate) fn new(pins: &'p PinMap, bring_up: BringUp<B>) -> Self {
        Self {
            pins,
            handles: bring_up.handles,
            report: bring_up.report,
        }
    }

    /// Pin map the board was brought up with
    pub fn pins(&self) -> &'p PinMap {
        self.pins
    }

    /// Status of every peripheral
    pub fn report(&self) -> &InitReport {
        &self.report
    }

    pub fn take_console(&mut self) -> Option<B::Console> {
        self.handles.console.take()
    }

    pub fn take_status_led(&mut self) -> Option<B::StatusLed> {
        self.handles.status_led.take()
    }

    pub fn take_gps_uart(&mut self) -> Option<B::GpsUart> {
        self.handles.gps_uart.take()
    }

    pub fn take_sensor_bus(&mut self) -> Option<B::SensorBus> {
        self.handles.sensor_bus.take()
    }

    pub fn take_host_spi(&mut self) -> Option<B::HostSpi> {
        self.handles.host_spi.take()
    }

    pub fn take_led_strip(&mut self) -> Option<B::LedStrip> {
        self.handles.led_strip.take()
    }
}
