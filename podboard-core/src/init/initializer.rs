//! Ordered, failure-isolated bring-up

use super::board::Board;
use super::peripheral::Peripheral;
use super::plan::BringUpPlan;
use super::status::{InitFailure, InitStatus, PeripheralInitError};
use crate::console::Console;
use crate::pins::{PinMap, Role};
use crate::time::{busy_wait_us, Clock};

/// Status of every peripheral after a bring-up run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitReport {
    statuses: [InitStatus; Peripheral::COUNT],
}

impl Default for InitReport {
    fn default() -> Self {
        Self::new()
    }
}

impl InitReport {
    /// Every peripheral `Uninitialized`
    pub fn new() -> Self {
        Self {
            statuses: [InitStatus::Uninitialized; Peripheral::COUNT],
        }
    }

    /// Current status of one peripheral
    pub fn status(&self, peripheral: Peripheral) -> InitStatus {
        self.statuses[peripheral.index()]
    }

    /// Check if one peripheral reached `Ready`
    pub fn is_ready(&self, peripheral: Peripheral) -> bool {
        self.status(peripheral).is_ready()
    }

    /// Number of `Ready` peripherals
    pub fn ready_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_ready()).count()
    }

    /// Number of `Failed` peripherals
    pub fn failed_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_failed()).count()
    }

    /// Number of peripherals left `Uninitialized` by a skipped step
    pub fn skipped_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| **s == InitStatus::Uninitialized)
            .count()
    }

    /// Failed peripherals with their reasons, in bring-up order
    pub fn failures(&self) -> impl Iterator<Item = PeripheralInitError> + '_ {
        Peripheral::BRING_UP_ORDER
            .iter()
            .filter_map(move |p| {
                self.status(*p).failure().map(|reason| PeripheralInitError {
                    peripheral: *p,
                    reason,
                })
            })
    }

    /// `(peripheral, status)` pairs in bring-up order
    pub fn iter(&self) -> impl Iterator<Item = (Peripheral, InitStatus)> + '_ {
        Peripheral::BRING_UP_ORDER
            .iter()
            .map(move |p| (*p, self.status(*p)))
    }

    fn begin(&mut self, peripheral: Peripheral) {
        let slot = &mut self.statuses[peripheral.index()];
        *slot = slot.begin();
    }

    fn complete(&mut self, peripheral: Peripheral, outcome: Result<(), InitFailure>) {
        let slot = &mut self.statuses[peripheral.index()];
        *slot = slot.complete(outcome);
    }
}

/// Handles of every peripheral that reached `Ready`
pub struct Handles<B: Board> {
    pub console: Option<B::Console>,
    pub status_led: Option<B::StatusLed>,
    pub gps_uart: Option<B::GpsUart>,
    pub sensor_bus: Option<B::SensorBus>,
    pub host_spi: Option<B::HostSpi>,
    pub led_strip: Option<B::LedStrip>,
}

impl<B: Board> Handles<B> {
    fn empty() -> Self {
        Self {
            console: None,
            status_led: None,
            gps_uart: None,
            sensor_bus: None,
            host_spi: None,
            led_strip: None,
        }
    }
}

/// Result of [`initialize_all`]: the Ready handles plus the full report
pub struct BringUp<B: Board> {
    pub handles: Handles<B>,
    pub report: InitReport,
}

/// Bring up every peripheral in [`Peripheral::BRING_UP_ORDER`], once each
///
/// Same as [`initialize_with`] under [`BringUpPlan::new`].
pub fn initialize_all<B: Board>(board: &mut B, pins: &PinMap) -> BringUp<B> {
    initialize_with(board, pins, &BringUpPlan::new(), &Unclocked)
}

/// Bring up every peripheral the plan does not skip, in bring-up order
///
/// Each step runs regardless of earlier failures. A step failing with a
/// transient reason is repeated under its [`RetryPolicy`], waiting
/// `backoff_us` on `clock` in between; it is marked `Failed` with the last
/// reason once the attempts run out. Skipped steps are never called and
/// stay `Uninitialized`.
///
/// Once the console is up, every step (the console's own included) writes
/// one line to it, plus one per retry.
///
/// Must run once per hardware reset; the caller enforces that through
/// [`crate::boot::BootLatch`].
///
/// [`RetryPolicy`]: super::plan::RetryPolicy
pub fn initialize_with<B, C>(
    board: &mut B,
    pins: &PinMap,
    plan: &BringUpPlan,
    clock: &C,
) -> BringUp<B>
where
    B: Board,
    C: Clock + ?Sized,
{
    let mut seq = Sequencer {
        plan,
        clock,
        report: InitReport::new(),
    };
    let mut handles = Handles::<B>::empty();

    handles.console = seq.run(&mut None::<B::Console>, Peripheral::DebugConsole, || {
        board.init_console()
    });
    log_step(&mut handles.console, &seq.report, Peripheral::DebugConsole, pins);

    handles.status_led = seq.run(&mut handles.console, Peripheral::StatusLed, || {
        board.init_status_led(pins.binding(Role::Led))
    });
    log_step(&mut handles.console, &seq.report, Peripheral::StatusLed, pins);

    handles.gps_uart = seq.run(&mut handles.console, Peripheral::GpsUart, || {
        board.init_gps_uart(pins.gps_uart())
    });
    log_step(&mut handles.console, &seq.report, Peripheral::GpsUart, pins);

    handles.sensor_bus = seq.run(&mut handles.console, Peripheral::SensorBus, || {
        board.init_sensor_bus(pins.binding(Role::SensorSda))
    });
    log_step(&mut handles.console, &seq.report, Peripheral::SensorBus, pins);

    handles.host_spi = seq.run(&mut handles.console, Peripheral::HostSpi, || {
        board.init_host_spi(pins.host_spi())
    });
    log_step(&mut handles.console, &seq.report, Peripheral::HostSpi, pins);

    handles.led_strip = seq.run(&mut handles.console, Peripheral::LedStrip, || {
        board.init_led_strip(pins.binding(Role::LedStripPio))
    });
    log_step(&mut handles.console, &seq.report, Peripheral::LedStrip, pins);

    let report = seq.report;
    match report.skipped_count() {
        0 => handles.console.write_line(format_args!(
            "boot: {}/{} peripherals ready",
            report.ready_count(),
            Peripheral::COUNT
        )),
        skipped => handles.console.write_line(format_args!(
            "boot: {}/{} peripherals ready, {} skipped",
            report.ready_count(),
            Peripheral::COUNT,
            skipped
        )),
    }

    BringUp { handles, report }
}

/// Clock for plans without backoff; never read when every step runs once
struct Unclocked;

impl Clock for Unclocked {
    fn now_us(&self) -> u64 {
        0
    }
}

struct Sequencer<'a, C: ?Sized> {
    plan: &'a BringUpPlan,
    clock: &'a C,
    report: InitReport,
}

impl<C: Clock + ?Sized> Sequencer<'_, C> {
    fn run<T, K: Console>(
        &mut self,
        console: &mut Option<K>,
        peripheral: Peripheral,
        mut step: impl FnMut() -> Result<T, InitFailure>,
    ) -> Option<T> {
        if self.plan.is_skipped(peripheral) {
            return None;
        }

        let policy = self.plan.retry_policy(peripheral);
        let attempts = policy.max_attempts();
        self.report.begin(peripheral);

        let mut attempt = 1;
        let outcome = loop {
            match step() {
                Err(reason) if reason.is_transient() && attempt < attempts => {
                    console.write_line(format_args!(
                        "boot: {} attempt {}/{} failed ({}), retrying",
                        peripheral, attempt, attempts, reason
                    ));
                    busy_wait_us(self.clock, policy.backoff_us);
                    attempt += 1;
                }
                other => break other,
            }
        };

        match outcome {
            Ok(handle) => {
                self.report.complete(peripheral, Ok(()));
                Some(handle)
            }
            Err(reason) => {
                self.report.complete(peripheral, Err(reason));
                None
            }
        }
    }
}

/// Pins are printed from the map so the log shows what the board was asked for
fn log_step<C: Console>(
    console: &mut Option<C>,
    report: &InitReport,
    peripheral: Peripheral,
    pins: &PinMap,
) {
    let Some(console) = console.as_mut() else {
        return;
    };

    let mut gpios = [0u8; 4];
    let roles = peripheral.roles();
    for (slot, role) in gpios.iter_mut().zip(roles) {
        *slot = pins.pin(*role);
    }
    let gpios = GpioList(&gpios[..roles.len()]);

    match report.status(peripheral) {
        InitStatus::Ready => {
            console.write_line(format_args!("boot: {} ready{}", peripheral, gpios));
        }
        InitStatus::Failed(reason) => {
            console.write_line(format_args!(
                "boot: {} FAILED ({}){}",
                peripheral, reason, gpios
            ));
        }
        InitStatus::Uninitialized => {
            console.write_line(format_args!("boot: {} skipped", peripheral));
        }
        other => {
            console.write_line(format_args!("boot: {} left {:?}", peripheral, other));
        }
    }
}

struct GpioList<'a>(&'a [u8]);

impl core::fmt::Display for GpioList<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str(" on gpio")?;
        for (i, pin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", pin)?;
        }
        Ok(())
    }
}
