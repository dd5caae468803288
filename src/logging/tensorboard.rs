//! Tensorboard logger
use super::StatsLogger;
use crate::config::AgentConfig;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Logger that saves scalar time series to a tensorboard event file.
pub struct TensorBoardLogger {
    writer: SummaryWriter,
}

impl fmt::Debug for TensorBoardLogger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TensorBoardLogger").finish_non_exhaustive()
    }
}

impl TensorBoardLogger {
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Self {
        Self {
            writer: SummaryWriter::new(log_dir),
        }
    }
}

/// Name of the run directory for a training run started at `start`.
///
/// For example `2024-01-31_12-00-00_SAC_DeepracerGym_Gaussian_autotune`.
pub fn run_name(start: &DateTime<Local>, config: &AgentConfig) -> String {
    format!(
        "{}_SAC_DeepracerGym_{}_{}",
        start.format("%Y-%m-%d_%H-%M-%S"),
        config.policy,
        if config.automatic_entropy_tuning {
            "autotune"
        } else {
            ""
        }
    )
}

impl StatsLogger for TensorBoardLogger {
    #[allow(clippy::cast_possible_truncation)]
    fn log_scalar(&mut self, tag: &str, value: f64, index: u64) {
        self.writer.add_scalar(tag, value as f32, index as usize);
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}

/// Flush when dropped
impl Drop for TensorBoardLogger {
    fn drop(&mut self) {
        self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn run_name_format() {
        let start = Local.with_ymd_and_hms(2024, 1, 31, 12, 5, 9).unwrap();
        let mut config = AgentConfig::default();
        assert_eq!(
            run_name(&start, &config),
            "2024-01-31_12-05-09_SAC_DeepracerGym_Gaussian_"
        );
        config.automatic_entropy_tuning = true;
        assert!(run_name(&start, &config).ends_with("_Gaussian_autotune"));
    }

    #[test]
    fn writes_event_file() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut logger = TensorBoardLogger::new(dir.path());
            logger.log_scalar("reward/train", -12.5, 1);
            logger.flush();
        }
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_some());
    }
}
