//! Logging statistics from training runs
mod display;
mod tensorboard;

pub use display::DisplayLogger;
pub use tensorboard::{run_name, TensorBoardLogger};

use std::collections::BTreeMap;

/// Log scalar time series from a training run.
pub trait StatsLogger {
    /// Log a scalar value.
    ///
    /// # Args
    /// * `tag` - The name that identifies the time series.
    /// * `value` - The value to log.
    /// * `index` - Position of the value in the time series (an update or episode count).
    fn log_scalar(&mut self, tag: &str, value: f64, index: u64);

    /// Write out any buffered values.
    fn flush(&mut self) {}
}

/// Logger that does nothing
impl StatsLogger for () {
    fn log_scalar(&mut self, _: &str, _: f64, _: u64) {}
}

impl<T: StatsLogger + ?Sized> StatsLogger for &mut T {
    fn log_scalar(&mut self, tag: &str, value: f64, index: u64) {
        T::log_scalar(self, tag, value, index)
    }
    fn flush(&mut self) {
        T::flush(self)
    }
}

impl<T: StatsLogger + ?Sized> StatsLogger for Box<T> {
    fn log_scalar(&mut self, tag: &str, value: f64, index: u64) {
        T::log_scalar(self, tag, value, index)
    }
    fn flush(&mut self) {
        T::flush(self)
    }
}

/// Log to both loggers.
impl<A: StatsLogger, B: StatsLogger> StatsLogger for (A, B) {
    fn log_scalar(&mut self, tag: &str, value: f64, index: u64) {
        self.0.log_scalar(tag, value, index);
        self.1.log_scalar(tag, value, index);
    }
    fn flush(&mut self) {
        self.0.flush();
        self.1.flush();
    }
}

/// Logger that keeps every value in memory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryLogger {
    series: BTreeMap<String, Vec<(u64, f64)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(index, value)` pairs logged under `tag`.
    pub fn series(&self, tag: &str) -> &[(u64, f64)] {
        self.series.get(tag).map_or(&[], Vec::as_slice)
    }

    /// All tags logged so far, in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

impl StatsLogger for MemoryLogger {
    fn log_scalar(&mut self, tag: &str, value: f64, index: u64) {
        self.series
            .entry(tag.to_owned())
            .or_default()
            .push((index, value));
    }
}
