//! Pod sensor-board firmware
//!
//! Brings up the board once, then runs the cooperative dispatcher forever on
//! the single embassy task.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::PIO0;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use podboard_core::dispatch::DispatchConfig;
use podboard_core::{BootLatch, Dispatcher, InitStatus};
use podboard_drivers::led::Heartbeat;
use podboard_hal_rp2040::EmbassyClock;

use crate::board::{PodBoard, StatusLed, BRING_UP, HEARTBEAT_PERIOD_US, PIN_MAP};
use crate::console::DefmtConsole;

mod board;
mod console;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

/// One bring-up per reset
static BOOT_LATCH: BootLatch = BootLatch::new();

// Dispatcher borrows these for the rest of the program
static CONSOLE: StaticCell<DefmtConsole> = StaticCell::new();
static HEARTBEAT: StaticCell<Heartbeat<StatusLed, EmbassyClock>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("podboard firmware starting...");

    let p = embassy_rp::init(Default::default());
    let mut board = PodBoard::new(p);

    let Some(token) = BOOT_LATCH.acquire() else {
        error!("boot latch already taken, refusing second bring-up");
        return;
    };

    let mut dispatcher: Dispatcher<'static, EmbassyClock> =
        Dispatcher::new(EmbassyClock, DispatchConfig::default());

    let mut ctx = match dispatcher.boot_with(token, &mut board, &PIN_MAP, &BRING_UP) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("boot rejected: {}", e);
            return;
        }
    };

    let report = *ctx.report();
    for (peripheral, status) in report.iter() {
        match status {
            InitStatus::Ready => debug!("{} ready", peripheral),
            InitStatus::Failed(reason) => warn!("{} failed: {}", peripheral, reason),
            InitStatus::Uninitialized => info!("{} skipped", peripheral),
            other => warn!("{} left in {}", peripheral, other),
        }
    }
    info!(
        "Bring-up done: {} ready, {} failed",
        report.ready_count(),
        report.failed_count()
    );

    if let Some(console) = ctx.take_console() {
        dispatcher.attach_console(CONSOLE.init(console));
    }

    match ctx.take_status_led() {
        Some(led) => {
            let heartbeat = HEARTBEAT.init(Heartbeat::new(led, EmbassyClock, HEARTBEAT_PERIOD_US));
            if let Err(e) = dispatcher.register(heartbeat) {
                warn!("heartbeat not registered: {}", e);
            }
        }
        None => warn!("no status LED, running without heartbeat"),
    }

    // Held for subsystems that have not been written yet
    let _gps_uart = ctx.take_gps_uart();
    let _sensor_bus = ctx.take_sensor_bus();
    let _host_spi = ctx.take_host_spi();
    let _led_strip = ctx.take_led_strip();

    info!("Dispatcher running");
    loop {
        dispatcher.run_once();
        embassy_futures::yield_now().await;
    }
}
