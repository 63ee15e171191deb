//! Sensors on the single-wire data line

mod presence;

pub use presence::{probe, ProbeError, ProbeTiming};
