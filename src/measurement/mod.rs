//! Measurement infrastructure for the benchmark.
//!
//! This module provides the lap stopwatch with trimmed robust statistics
//! used to time kernel dispatches and result readbacks.

mod lap_timer;

pub use lap_timer::LapTimer;
