//! Training loop driver
mod counters;
mod driver;
mod run;
mod summary;

pub use counters::EpisodeCounters;
pub use driver::{Control, DriverError, TrainingDriver};
pub use run::run;
pub use summary::RunSummary;
