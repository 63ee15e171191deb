//! Scripted board, clock and console for host tests

use core::cell::Cell;
use core::fmt;

use crate::console::Console;
use crate::init::{Board, InitFailure, Peripheral};
use crate::pins::{PinBinding, PinMap, Role, SpiPins, UartPins};
use crate::time::Clock;

const REFERENCE: PinMap = PinMap::new([
    PinBinding::new(Role::Led, 25),
    PinBinding::new(Role::GpsTx, 0),
    PinBinding::new(Role::GpsRx, 1),
    PinBinding::new(Role::SensorSda, 2),
    PinBinding::new(Role::SpiRx, 8),
    PinBinding::new(Role::SpiCs, 9),
    PinBinding::new(Role::SpiSck, 10),
    PinBinding::new(Role::SpiTx, 11),
    PinBinding::new(Role::LedStripPio, 3),
]);

pub(crate) fn reference_pins() -> PinMap {
    REFERENCE
}

/// Outcome of each bring-up step; `None` succeeds
#[derive(Debug, Clone, Copy)]
pub(crate) struct Script {
    outcomes: [Option<InitFailure>; Peripheral::COUNT],
    /// Failures served before the step's own outcome
    flaky: [Option<(InitFailure, u8)>; Peripheral::COUNT],
}

impl Script {
    pub(crate) fn healthy() -> Self {
        Self::from_outcomes([None; Peripheral::COUNT])
    }

    pub(crate) fn from_outcomes(outcomes: [Option<InitFailure>; Peripheral::COUNT]) -> Self {
        Self {
            outcomes,
            flaky: [None; Peripheral::COUNT],
        }
    }

    pub(crate) fn fail(mut self, peripheral: Peripheral, reason: InitFailure) -> Self {
        self.outcomes[peripheral.index()] = Some(reason);
        self
    }

    /// Fail the first `times` attempts with `reason`
    pub(crate) fn fail_times(
        mut self,
        peripheral: Peripheral,
        reason: InitFailure,
        times: u8,
    ) -> Self {
        self.flaky[peripheral.index()] = Some((reason, times));
        self
    }
}

/// Handle for every non-console peripheral
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SimHandle(pub Peripheral);

/// Board that follows a [`Script`] and records what it was asked to do
///
/// A successful step consumes its hardware, so a second bring-up on the same
/// board reports `ResourceTaken`.
pub(crate) struct SimBoard {
    script: Script,
    calls: Vec<Peripheral>,
    pins_seen: [Vec<u8>; Peripheral::COUNT],
    taken: [bool; Peripheral::COUNT],
}

impl SimBoard {
    pub(crate) fn new(script: Script) -> Self {
        Self {
            script,
            calls: Vec::new(),
            pins_seen: Default::default(),
            taken: [false; Peripheral::COUNT],
        }
    }

    pub(crate) fn calls(&self) -> &[Peripheral] {
        &self.calls
    }

    pub(crate) fn attempts(&self, peripheral: Peripheral) -> usize {
        self.calls.iter().filter(|p| **p == peripheral).count()
    }

    pub(crate) fn pins_seen(&self, peripheral: Peripheral) -> &[u8] {
        &self.pins_seen[peripheral.index()]
    }

    fn step(&mut self, peripheral: Peripheral, pins: &[PinBinding]) -> Result<(), InitFailure> {
        self.calls.push(peripheral);
        self.pins_seen[peripheral.index()] = pins.iter().map(|b| b.pin()).collect();

        if self.taken[peripheral.index()] {
            return Err(InitFailure::ResourceTaken);
        }
        if let Some((reason, left)) = &mut self.script.flaky[peripheral.index()] {
            if *left > 0 {
                *left -= 1;
                return Err(*reason);
            }
        }
        if let Some(reason) = self.script.outcomes[peripheral.index()] {
            return Err(reason);
        }
        self.taken[peripheral.index()] = true;
        Ok(())
    }
}

impl Board for SimBoard {
    type Console = SimConsole;
    type StatusLed = SimHandle;
    type GpsUart = SimHandle;
    type SensorBus = SimHandle;
    type HostSpi = SimHandle;
    type LedStrip = SimHandle;

    fn init_console(&mut self) -> Result<SimConsole, InitFailure> {
        self.step(Peripheral::DebugConsole, &[])?;
        Ok(SimConsole::default())
    }

    fn init_status_led(&mut self, led: PinBinding) -> Result<SimHandle, InitFailure> {
        self.step(Peripheral::StatusLed, &[led])?;
        Ok(SimHandle(Peripheral::StatusLed))
    }

    fn init_gps_uart(&mut self, pins: UartPins) -> Result<SimHandle, InitFailure> {
        self.step(Peripheral::GpsUart, &[pins.tx, pins.rx])?;
        Ok(SimHandle(Peripheral::GpsUart))
    }

    fn init_sensor_bus(&mut self, data: PinBinding) -> Result<SimHandle, InitFailure> {
        self.step(Peripheral::SensorBus, &[data])?;
        Ok(SimHandle(Peripheral::SensorBus))
    }

    fn init_host_spi(&mut self, pins: SpiPins) -> Result<SimHandle, InitFailure> {
        self.step(Peripheral::HostSpi, &[pins.rx, pins.cs, pins.sck, pins.tx])?;
        Ok(SimHandle(Peripheral::HostSpi))
    }

    fn init_led_strip(&mut self, data: PinBinding) -> Result<SimHandle, InitFailure> {
        self.step(Peripheral::LedStrip, &[data])?;
        Ok(SimHandle(Peripheral::LedStrip))
    }
}

/// Console that keeps every line
#[derive(Debug, Default)]
pub(crate) struct SimConsole {
    lines: Vec<String>,
}

impl SimConsole {
    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Console for SimConsole {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        self.lines.push(line.to_string());
    }
}

/// Manually advanced clock; `step` is added after every read
#[derive(Debug, Default)]
pub(crate) struct SimClock {
    now: Cell<u64>,
    step: u64,
}

impl SimClock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_step(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }

    pub(crate) fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }
}

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}
