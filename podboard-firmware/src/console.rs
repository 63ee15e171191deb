//! Debug console over defmt/RTT

use core::fmt::{self, Write};

use heapless::String;
use podboard_core::Console;

/// Longest line forwarded in one piece
pub const LINE_CAPACITY: usize = 128;

/// Formats each line locally, then hands it to defmt as a string
pub struct DefmtConsole {
    line: String<LINE_CAPACITY>,
}

impl DefmtConsole {
    pub const fn new() -> Self {
        Self { line: String::new() }
    }
}

impl Console for DefmtConsole {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        self.line.clear();
        if self.line.write_fmt(line).is_err() {
            // Keep what fit
            defmt::info!("{=str}...", self.line.as_str());
            return;
        }
        defmt::info!("{=str}", self.line.as_str());
    }
}
