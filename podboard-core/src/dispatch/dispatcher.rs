//! Boot sequencing and the round-robin poll loop

use core::fmt;

use heapless::Vec;

use super::subsystem::{PollResult, Subsystem};
use crate::boot::{BootContext, BootToken};
use crate::console::Console;
use crate::init::{initialize_with, Board, BringUpPlan};
use crate::pins::PinMap;
use crate::time::Clock;

/// Default subsystem capacity
pub const MAX_SUBSYSTEMS: usize = 8;

/// Dispatcher lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatcherState {
    /// Bring-up has not run yet
    Booting,
    /// Bring-up done; polling subsystems
    Running,
}

/// Poll budget settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchConfig {
    /// Longest a single `poll_once` may take
    pub poll_budget_us: u64,
    /// Overruns in a row before a subsystem is suspended
    pub max_consecutive_overruns: u8,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            poll_budget_us: 2_000,
            max_consecutive_overruns: 3,
        }
    }
}

/// Dispatcher misuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Registration attempted before boot
    NotRunning,
    /// Boot attempted twice
    AlreadyRunning,
    /// No free subsystem slot
    Full,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NotRunning => f.write_str("dispatcher not running"),
            DispatchError::AlreadyRunning => f.write_str("dispatcher already running"),
            DispatchError::Full => f.write_str("no free subsystem slot"),
        }
    }
}

/// Handle returned by [`Dispatcher::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubsystemId(usize);

impl SubsystemId {
    /// Registration index
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Per-subsystem timing record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollStats {
    pub polls: u32,
    pub overruns: u32,
    pub consecutive_overruns: u8,
    /// Slowest poll seen
    pub worst_us: u64,
    /// Removed from the poll set after repeated overruns
    pub suspended: bool,
}

impl PollStats {
    /// Record one poll; returns true if it overran
    fn record(&mut self, elapsed_us: u64, budget_us: u64) -> bool {
        self.polls = self.polls.saturating_add(1);
        self.worst_us = self.worst_us.max(elapsed_us);

        if elapsed_us > budget_us {
            self.overruns = self.overruns.saturating_add(1);
            self.consecutive_overruns = self.consecutive_overruns.saturating_add(1);
            true
        } else {
            self.consecutive_overruns = 0;
            false
        }
    }
}

/// Counts for one pass over the poll set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoundSummary {
    pub polled: usize,
    pub progressed: usize,
    pub overruns: usize,
}

struct Slot<'a> {
    subsystem: &'a mut dyn Subsystem,
    stats: PollStats,
}

/// Single-threaded cooperative scheduler
///
/// `Booting` until [`Dispatcher::boot`] runs bring-up, then `Running` for the
/// rest of the process lifetime, whatever bring-up reported.
pub struct Dispatcher<'a, C: Clock, const N: usize = MAX_SUBSYSTEMS> {
    state: DispatcherState,
    clock: C,
    config: DispatchConfig,
    slots: Vec<Slot<'a>, N>,
    console: Option<&'a mut dyn Console>,
}

impl<'a, C: Clock, const N: usize> Dispatcher<'a, C, N> {
    pub fn new(clock: C, config: DispatchConfig) -> Self {
        Self {
            state: DispatcherState::Booting,
            clock,
            config,
            slots: Vec::new(),
            console: None,
        }
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Run bring-up with every step attempted once and enter `Running`
    pub fn boot<'p, B: Board>(
        &mut self,
        token: BootToken,
        board: &mut B,
        pins: &'p PinMap,
    ) -> Result<BootContext<'p, B>, DispatchError> {
        self.boot_with(token, board, pins, &BringUpPlan::new())
    }

    /// Run bring-up under `plan` and enter `Running`
    ///
    /// Retry backoff waits on the dispatcher's clock. Peripheral failures are
    /// recorded in the returned context's report and never keep the
    /// dispatcher out of `Running`.
    pub fn boot_with<'p, B: Board>(
        &mut self,
        _token: BootToken,
        board: &mut B,
        pins: &'p PinMap,
        plan: &BringUpPlan,
    ) -> Result<BootContext<'p, B>, DispatchError> {
        if self.state == DispatcherState::Running {
            return Err(DispatchError::AlreadyRunning);
        }

        let bring_up = initialize_with(board, pins, plan, &self.clock);
        self.state = DispatcherState::Running;
        Ok(BootContext::new(pins, bring_up))
    }

    /// Send dispatcher diagnostics to `console`
    pub fn attach_console(&mut self, console: &'a mut dyn Console) {
        self.console = Some(console);
    }

    /// Add a subsystem to the end of the poll order
    pub fn register(
        &mut self,
        subsystem: &'a mut dyn Subsystem,
    ) -> Result<SubsystemId, DispatchError> {
        if self.state != DispatcherState::Running {
            return Err(DispatchError::NotRunning);
        }

        let id = SubsystemId(self.slots.len());
        let name = subsystem.name();
        self.slots
            .push(Slot {
                subsystem,
                stats: PollStats::default(),
            })
            .map_err(|_| DispatchError::Full)?;

        self.console
            .write_line(format_args!("dispatch: {} registered as #{}", name, id.0));
        Ok(id)
    }

    /// Poll every live subsystem once, in registration order
    ///
    /// Does nothing before boot.
    pub fn run_once(&mut self) -> RoundSummary {
        let mut summary = RoundSummary::default();
        if self.state != DispatcherState::Running {
            return summary;
        }

        let budget_us = self.config.poll_budget_us;
        let max_overruns = self.config.max_consecutive_overruns;

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.stats.suspended {
                continue;
            }

            let start = self.clock.now_us();
            let result = slot.subsystem.poll_once();
            let elapsed_us = self.clock.now_us().saturating_sub(start);

            summary.polled += 1;
            if result == PollResult::Progressed {
                summary.progressed += 1;
            }

            if !slot.stats.record(elapsed_us, budget_us) {
                continue;
            }
            summary.overruns += 1;
            self.console.write_line(format_args!(
                "dispatch: {} (#{}) overran: {} us > {} us",
                slot.subsystem.name(),
                index,
                elapsed_us,
                budget_us
            ));

            if slot.stats.consecutive_overruns >= max_overruns {
                slot.stats.suspended = true;
                self.console.write_line(format_args!(
                    "dispatch: {} (#{}) suspended after {} overruns in a row",
                    slot.subsystem.name(),
                    index,
                    slot.stats.consecutive_overruns
                ));
            }
        }

        summary
    }

    /// Timing record for one subsystem
    pub fn stats(&self, id: SubsystemId) -> Option<&PollStats> {
        self.slots.get(id.0).map(|slot| &slot.stats)
    }

    /// Number of registered subsystems that are still polled
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.stats.suspended).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::BootLatch;
    use crate::init::{InitFailure, InitStatus, Peripheral, PeripheralInitError, RetryPolicy};
    use crate::sim::{reference_pins, Script, SimBoard, SimClock, SimConsole};
    use proptest::prelude::*;

    /// Takes a fixed time per poll and reports progress every other poll
    struct Worker<'c> {
        name: &'static str,
        clock: &'c SimClock,
        cost_us: u64,
        polls: u32,
    }

    impl<'c> Worker<'c> {
        fn new(name: &'static str, clock: &'c SimClock, cost_us: u64) -> Self {
            Self {
                name,
                clock,
                cost_us,
                polls: 0,
            }
        }
    }

    impl Subsystem for Worker<'_> {
        fn name(&self) -> &'static str {
            self.name
        }

        fn poll_once(&mut self) -> PollResult {
            self.clock.advance(self.cost_us);
            self.polls += 1;
            if self.polls % 2 == 0 {
                PollResult::Progressed
            } else {
                PollResult::Idle
            }
        }
    }

    fn token() -> BootToken {
        BootLatch::new().acquire().unwrap()
    }

    #[test]
    fn test_healthy_board_boots_to_running() {
        let clock = SimClock::new();
        let pins = reference_pins();
        let mut board = SimBoard::new(Script::healthy());
        let mut dispatcher: Dispatcher<'_, _> = Dispatcher::new(&clock, DispatchConfig::default());
        assert_eq!(dispatcher.state(), DispatcherState::Booting);

        let ctx = dispatcher.boot(token(), &mut board, &pins).unwrap();

        assert_eq!(dispatcher.state(), DispatcherState::Running);
        assert_eq!(ctx.report().ready_count(), 6);
        assert_eq!(ctx.report().failed_count(), 0);
    }

    #[test]
    fn test_sensor_timeout_still_running() {
        let clock = SimClock::new();
        let pins = reference_pins();
        let mut board = SimBoard::new(
            Script::healthy().fail(Peripheral::SensorBus, InitFailure::BusTimeout),
        );
        let mut dispatcher: Dispatcher<'_, _> = Dispatcher::new(&clock, DispatchConfig::default());

        let mut ctx = dispatcher.boot(token(), &mut board, &pins).unwrap();

        assert_eq!(dispatcher.state(), DispatcherState::Running);
        assert_eq!(ctx.report().ready_count(), 5);
        assert_eq!(
            ctx.report().failures().collect::<std::vec::Vec<_>>(),
            vec![PeripheralInitError {
                peripheral: Peripheral::SensorBus,
                reason: InitFailure::BusTimeout,
            }]
        );
        assert!(ctx.take_sensor_bus().is_none());
        assert!(ctx.take_console().is_some());
    }

    #[test]
    fn test_all_failing_still_running() {
        let clock = SimClock::new();
        let pins = reference_pins();
        let mut board = SimBoard::new(Script::from_outcomes([Some(InitFailure::ClockConfig); 6]));
        let mut dispatcher: Dispatcher<'_, _> = Dispatcher::new(&clock, DispatchConfig::default());

        let ctx = dispatcher.boot(token(), &mut board, &pins).unwrap();

        assert_eq!(dispatcher.state(), DispatcherState::Running);
        assert_eq!(ctx.report().ready_count(), 0);
        for p in Peripheral::BRING_UP_ORDER {
            assert_eq!(ctx.report().status(p), InitStatus::Failed(InitFailure::ClockConfig));
        }
    }

    #[test]
    fn test_cold_sensor_recovers_with_boot_plan() {
        // Sensor still in its power-up window for the first two attempts
        let clock = SimClock::with_step(1_000);
        let pins = reference_pins();
        let mut board = SimBoard::new(
            Script::healthy().fail_times(Peripheral::SensorBus, InitFailure::BusTimeout, 2),
        );
        let plan = BringUpPlan::new().retry(
            Peripheral::SensorBus,
            RetryPolicy {
                attempts: 8,
                backoff_us: 250_000,
            },
        );
        let mut dispatcher: Dispatcher<'_, _> = Dispatcher::new(&clock, DispatchConfig::default());

        let mut ctx = dispatcher.boot_with(token(), &mut board, &pins, &plan).unwrap();

        assert_eq!(dispatcher.state(), DispatcherState::Running);
        assert_eq!(ctx.report().ready_count(), 6);
        assert!(ctx.take_sensor_bus().is_some());
        assert!(clock.now_us() >= 2 * 250_000);
    }

    #[test]
    fn test_second_boot_rejected() {
        let clock = SimClock::new();
        let pins = reference_pins();
        let mut board = SimBoard::new(Script::healthy());
        let mut dispatcher: Dispatcher<'_, _> = Dispatcher::new(&clock, DispatchConfig::default());

        assert!(dispatcher.boot(token(), &mut board, &pins).is_ok());
        let calls = board.calls().len();

        let second = dispatcher.boot(token(), &mut board, &pins);
        assert!(matches!(second, Err(DispatchError::AlreadyRunning)));
        // bring-up did not run again
        assert_eq!(board.calls().len(), calls);
    }

    #[test]
    fn test_register_before_boot_rejected() {
        let clock = SimClock::new();
        let mut worker = Worker::new("worker", &clock, 0);
        let mut dispatcher: Dispatcher<'_, _> = Dispatcher::new(&clock, DispatchConfig::default());

        assert_eq!(dispatcher.register(&mut worker).unwrap_err(), DispatchError::NotRunning);
        assert_eq!(dispatcher.run_once(), RoundSummary::default());
    }

    #[test]
    fn test_register_beyond_capacity() {
        let clock = SimClock::new();
        let pins = reference_pins();
        let mut board = SimBoard::new(Script::healthy());
        let mut a = Worker::new("a", &clock, 0);
        let mut b = Worker::new("b", &clock, 0);
        let mut c = Worker::new("c", &clock, 0);
        let mut dispatcher: Dispatcher<'_, _, 2> =
            Dispatcher::new(&clock, DispatchConfig::default());
        dispatcher.boot(token(), &mut board, &pins).unwrap();

        assert_eq!(dispatcher.register(&mut a).unwrap().index(), 0);
        assert_eq!(dispatcher.register(&mut b).unwrap().index(), 1);
        assert_eq!(dispatcher.register(&mut c).unwrap_err(), DispatchError::Full);
    }

    #[test]
    fn test_round_polls_in_order_and_counts_progress() {
        let clock = SimClock::new();
        let pins = reference_pins();
        let mut board = SimBoard::new(Script::healthy());
        let mut a = Worker::new("a", &clock, 10);
        let mut b = Worker::new("b", &clock, 20);
        let mut dispatcher: Dispatcher<'_, _> = Dispatcher::new(&clock, DispatchConfig::default());
        dispatcher.boot(token(), &mut board, &pins).unwrap();
        let id_a = dispatcher.register(&mut a).unwrap();
        let id_b = dispatcher.register(&mut b).unwrap();

        let first = dispatcher.run_once();
        assert_eq!(first, RoundSummary { polled: 2, progressed: 0, overruns: 0 });
        let second = dispatcher.run_once();
        assert_eq!(second, RoundSummary { polled: 2, progressed: 2, overruns: 0 });

        let stats_a = dispatcher.stats(id_a).unwrap();
        assert_eq!(stats_a.polls, 2);
        assert_eq!(stats_a.worst_us, 10);
        assert_eq!(dispatcher.stats(id_b).unwrap().worst_us, 20);
        assert!(dispatcher.stats(SubsystemId(5)).is_none());
    }

    #[test]
    fn test_repeat_overrun_suspends_only_offender() {
        let clock = SimClock::new();
        let pins = reference_pins();
        let mut board = SimBoard::new(Script::healthy());
        let mut console = SimConsole::default();
        let mut quick = Worker::new("quick", &clock, 100);
        let mut slow = Worker::new("slow", &clock, 5_000);
        let config = DispatchConfig {
            poll_budget_us: 2_000,
            max_consecutive_overruns: 3,
        };

        {
            let mut dispatcher: Dispatcher<'_, _> = Dispatcher::new(&clock, config);
            dispatcher.boot(token(), &mut board, &pins).unwrap();
            dispatcher.attach_console(&mut console);
            let quick_id = dispatcher.register(&mut quick).unwrap();
            let slow_id = dispatcher.register(&mut slow).unwrap();

            for _ in 0..2 {
                assert_eq!(dispatcher.run_once().overruns, 1);
            }
            assert_eq!(dispatcher.live_count(), 2);

            let third = dispatcher.run_once();
            assert_eq!(third.overruns, 1);
            assert_eq!(dispatcher.live_count(), 1);

            let fourth = dispatcher.run_once();
            assert_eq!(fourth.polled, 1);
            assert_eq!(fourth.overruns, 0);

            let slow_stats = dispatcher.stats(slow_id).unwrap();
            assert!(slow_stats.suspended);
            assert_eq!(slow_stats.polls, 3);
            assert_eq!(slow_stats.overruns, 3);
            assert_eq!(slow_stats.worst_us, 5_000);

            let quick_stats = dispatcher.stats(quick_id).unwrap();
            assert!(!quick_stats.suspended);
            assert_eq!(quick_stats.polls, 4);
        }

        let lines = console.lines();
        assert!(lines
            .iter()
            .any(|l| l == "dispatch: slow (#1) overran: 5000 us > 2000 us"));
        let suspended: std::vec::Vec<_> =
            lines.iter().filter(|l| l.contains("suspended")).collect();
        assert_eq!(suspended.len(), 1);
        assert_eq!(suspended[0], "dispatch: slow (#1) suspended after 3 overruns in a row");
    }

    #[test]
    fn test_overrun_streak_resets_on_fast_poll() {
        let mut stats = PollStats::default();
        assert!(stats.record(3_000, 2_000));
        assert!(stats.record(3_000, 2_000));
        assert!(!stats.record(2_000, 2_000));
        assert_eq!(stats.consecutive_overruns, 0);
        assert_eq!(stats.overruns, 2);
        assert_eq!(stats.polls, 3);
    }

    proptest! {
        #[test]
        fn prop_always_running_after_boot(
            outcomes in proptest::array::uniform6(
                proptest::option::of(Just(InitFailure::DeviceNotPresent))
            )
        ) {
            let clock = SimClock::new();
            let pins = reference_pins();
            let mut board = SimBoard::new(Script::from_outcomes(outcomes));
            let mut dispatcher: Dispatcher<'_, _> =
                Dispatcher::new(&clock, DispatchConfig::default());

            let ctx = dispatcher.boot(token(), &mut board, &pins);
            prop_assert!(ctx.is_ok());
            prop_assert_eq!(dispatcher.state(), DispatcherState::Running);
        }
    }
}
