//! Pod sensor board, revision A
//!
//! Pin map plus the [`Board`] implementation over embassy-rp. Pins wired to
//! a UART/SPI/PIO block are held as concrete peripherals; every step checks
//! them against the pin map before touching hardware, so a map edited without
//! a matching board change fails that one step instead of driving the wrong
//! pin.

use embassy_rp::clocks::{clk_peri_freq, clk_sys_freq};
use embassy_rp::gpio::{Flex, Level, Output};
use embassy_rp::peripherals::{
    PIN_0, PIN_1, PIN_10, PIN_11, PIN_3, PIN_8, PIN_9, PIO0, SPI1, UART0,
};
use embassy_rp::pio::Pio;
use embassy_rp::spi::{Blocking, Spi};
use embassy_rp::uart::Uart;
use embassy_rp::{Peri, Peripherals};

use podboard_core::init::{BringUpPlan, Peripheral, RetryPolicy};
use podboard_core::pins::{PinBinding, PinMap, Role, SpiPins, UartPins};
use podboard_core::{Board, InitFailure};
use podboard_drivers::led::blank;
use podboard_drivers::sensor::{probe, ProbeTiming};
use podboard_hal::spi::{Mode, SpiConfig};
use podboard_hal::uart::UartConfig;
use podboard_hal_rp2040::functions::is_pio_capable;
use podboard_hal_rp2040::gpio::{GpioOutput, SensorLine};
use podboard_hal_rp2040::spi::HostSpi;
use podboard_hal_rp2040::strip::PioStrip;
use podboard_hal_rp2040::uart::{baudrate_supported, GpsUart};
use podboard_hal_rp2040::{
    spi_for_pins, uart_for_pins, EmbassyClock, PinBank, PinError, SpiId, UartId,
};

use crate::console::DefmtConsole;
use crate::Irqs;

/// Role to GPIO bindings for this revision
pub const PIN_MAP: PinMap = PinMap::new([
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

/// GPS receiver line settings
pub const GPS_UART: UartConfig = UartConfig::NMEA;

/// Host link settings
pub const HOST_SPI: SpiConfig = SpiConfig {
    frequency: 1_000_000,
    mode: Mode::Mode0,
};

/// Pixels on the strip header
pub const STRIP_LEN: usize = 16;

/// Status LED blink period
pub const HEARTBEAT_PERIOD_US: u64 = 1_000_000;

/// DHT-class sensors ignore start pulses for up to 2 s after power-up
const SENSOR_WARM_UP: RetryPolicy = RetryPolicy {
    attempts: 10,
    backoff_us: 250_000,
};

/// Steps run at boot; the strip header is only populated on some builds
pub const BRING_UP: BringUpPlan = {
    let plan = BringUpPlan::new().retry(Peripheral::SensorBus, SENSOR_WARM_UP);
    if cfg!(feature = "led-strip") {
        plan
    } else {
        plan.skip(Peripheral::LedStrip)
    }
};

// GPIOs the bus peripherals are wired to on this revision
const GPS_WIRED: (u8, u8) = (0, 1);
const SPI_WIRED: (u8, u8, u8, u8) = (8, 9, 10, 11);
const STRIP_WIRED: u8 = 3;

pub type StatusLed = GpioOutput<Output<'static>>;
pub type HostLink = HostSpi<Spi<'static, SPI1, Blocking>, Output<'static>>;
pub type LedStrip = PioStrip<'static, PIO0, 0, EmbassyClock>;

struct GpsParts {
    uart: Peri<'static, UART0>,
    tx: Peri<'static, PIN_0>,
    rx: Peri<'static, PIN_1>,
}

struct SpiParts {
    spi: Peri<'static, SPI1>,
    rx: Peri<'static, PIN_8>,
    cs: Peri<'static, PIN_9>,
    sck: Peri<'static, PIN_10>,
    tx: Peri<'static, PIN_11>,
}

struct StripParts {
    pio: Peri<'static, PIO0>,
    data: Peri<'static, PIN_3>,
}

/// Hardware owned by the board until bring-up hands it out
pub struct PodBoard {
    gpio: PinBank,
    gps: Option<GpsParts>,
    spi: Option<SpiParts>,
    strip: Option<StripParts>,
    /// Sensor line kept between probe attempts
    sensor: Option<SensorLine<'static>>,
    claimed: [bool; Peripheral::COUNT],
}

impl PodBoard {
    /// Move the pins this board uses out of `p`
    pub fn new(p: Peripherals) -> Self {
        let mut gpio = PinBank::new();
        // In range by construction; the bank only rejects numbers >= 30
        let _ = gpio.insert(25, p.PIN_25.into());
        let _ = gpio.insert(2, p.PIN_2.into());

        Self {
            gpio,
            gps: Some(GpsParts {
                uart: p.UART0,
                tx: p.PIN_0,
                rx: p.PIN_1,
            }),
            spi: Some(SpiParts {
                spi: p.SPI1,
                rx: p.PIN_8,
                cs: p.PIN_9,
                sck: p.PIN_10,
                tx: p.PIN_11,
            }),
            strip: Some(StripParts {
                pio: p.PIO0,
                data: p.PIN_3,
            }),
            sensor: None,
            claimed: [false; Peripheral::COUNT],
        }
    }

    fn claim(&mut self, peripheral: Peripheral) -> Result<(), InitFailure> {
        if self.claimed[peripheral.index()] {
            return Err(InitFailure::ResourceTaken);
        }
        Ok(())
    }

    fn claimed(&mut self, peripheral: Peripheral) {
        self.claimed[peripheral.index()] = true;
    }
}

fn bank_error(err: PinError) -> InitFailure {
    match err {
        PinError::InvalidPin => InitFailure::PinFunction,
        PinError::Unavailable => InitFailure::PinConflict,
    }
}

impl Board for PodBoard {
    type Console = DefmtConsole;
    type StatusLed = StatusLed;
    type GpsUart = GpsUart<'static>;
    type SensorBus = SensorLine<'static>;
    type HostSpi = HostLink;
    type LedStrip = LedStrip;

    fn init_console(&mut self) -> Result<DefmtConsole, InitFailure> {
        self.claim(Peripheral::DebugConsole)?;
        self.claimed(Peripheral::DebugConsole);
        Ok(DefmtConsole::new())
    }

    fn init_status_led(&mut self, led: PinBinding) -> Result<StatusLed, InitFailure> {
        self.claim(Peripheral::StatusLed)?;
        let pin = self.gpio.take(led.pin()).map_err(bank_error)?;
        self.claimed(Peripheral::StatusLed);
        Ok(GpioOutput::new(Output::new(pin, Level::Low), false))
    }

    fn init_gps_uart(&mut self, pins: UartPins) -> Result<GpsUart<'static>, InitFailure> {
        self.claim(Peripheral::GpsUart)?;
        match uart_for_pins(pins.tx.pin(), pins.rx.pin()) {
            None => return Err(InitFailure::PinFunction),
            Some(UartId::Uart1) => return Err(InitFailure::PinConflict),
            Some(UartId::Uart0) => {}
        }
        if (pins.tx.pin(), pins.rx.pin()) != GPS_WIRED {
            return Err(InitFailure::PinConflict);
        }
        if !baudrate_supported(GPS_UART.baudrate, clk_peri_freq()) {
            return Err(InitFailure::ClockConfig);
        }

        let parts = self.gps.take().ok_or(InitFailure::ResourceTaken)?;
        let uart = Uart::new_blocking(
            parts.uart,
            parts.tx,
            parts.rx,
            podboard_hal_rp2040::uart::to_embassy_config(&GPS_UART),
        );
        self.claimed(Peripheral::GpsUart);
        Ok(GpsUart::new(uart))
    }

    fn init_sensor_bus(&mut self, data: PinBinding) -> Result<SensorLine<'static>, InitFailure> {
        self.claim(Peripheral::SensorBus)?;
        let mut line = match self.sensor.take() {
            Some(line) => line,
            None => {
                let pin = self.gpio.take(data.pin()).map_err(bank_error)?;
                SensorLine::new(Flex::new(pin))
            }
        };

        if let Err(err) = probe(&mut line, &EmbassyClock, &ProbeTiming::default()) {
            // Held for the next attempt
            self.sensor = Some(line);
            return Err(err.into());
        }
        self.claimed(Peripheral::SensorBus);
        Ok(line)
    }

    fn init_host_spi(&mut self, pins: SpiPins) -> Result<HostLink, InitFailure> {
        self.claim(Peripheral::HostSpi)?;
        match spi_for_pins(&pins) {
            None => return Err(InitFailure::PinFunction),
            Some(SpiId::Spi0) => return Err(InitFailure::PinConflict),
            Some(SpiId::Spi1) => {}
        }
        let requested = (pins.rx.pin(), pins.cs.pin(), pins.sck.pin(), pins.tx.pin());
        if requested != SPI_WIRED {
            return Err(InitFailure::PinConflict);
        }
        if HOST_SPI.frequency == 0 || HOST_SPI.frequency > clk_peri_freq() / 2 {
            return Err(InitFailure::ClockConfig);
        }

        let parts = self.spi.take().ok_or(InitFailure::ResourceTaken)?;
        let bus = Spi::new_blocking(
            parts.spi,
            parts.sck,
            parts.tx,
            parts.rx,
            podboard_hal_rp2040::spi::to_embassy_config(&HOST_SPI),
        );
        let cs = Output::new(parts.cs, Level::High);
        self.claimed(Peripheral::HostSpi);
        Ok(HostSpi::new(bus, cs))
    }

    fn init_led_strip(&mut self, data: PinBinding) -> Result<LedStrip, InitFailure> {
        self.claim(Peripheral::LedStrip)?;
        if !is_pio_capable(data.pin()) {
            return Err(InitFailure::PinFunction);
        }
        if data.pin() != STRIP_WIRED {
            return Err(InitFailure::PinConflict);
        }

        let parts = self.strip.take().ok_or(InitFailure::ResourceTaken)?;
        let Pio {
            mut common, sm0, ..
        } = Pio::new(parts.pio, Irqs);
        let mut strip = PioStrip::new(
            &mut common,
            sm0,
            parts.data,
            EmbassyClock,
            clk_sys_freq(),
            STRIP_LEN,
        )?;
        self.claimed(Peripheral::LedStrip);

        let len = strip.len();
        blank(&mut strip, len).map_err(|_| InitFailure::BusTimeout)?;
        Ok(strip)
    }
}
