//! Line-oriented diagnostics sink

use core::fmt;

/// Plain-text diagnostics output
///
/// Writing is infallible: a sink that cannot deliver a line drops it, so
/// logging never changes the outcome of the code doing the logging.
pub trait Console {
    /// Emit one line; the sink adds its own terminator
    fn write_line(&mut self, line: fmt::Arguments<'_>);
}

impl<C: Console + ?Sized> Console for &mut C {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        (**self).write_line(line)
    }
}

/// No console: lines are dropped
impl<C: Console> Console for Option<C> {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        if let Some(console) = self {
            console.write_line(line);
        }
    }
}
