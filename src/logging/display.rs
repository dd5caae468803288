//! Display logger
use super::StatsLogger;
use yansi::Paint;

/// Logger that displays selected time series to standard error.
///
/// Only tags starting with one of the configured prefixes are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLogger {
    prefixes: Vec<String>,
}

impl DisplayLogger {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether values logged under `tag` are displayed.
    pub fn shows(&self, tag: &str) -> bool {
        self.prefixes.iter().any(|p| tag.starts_with(p.as_str()))
    }
}

/// Displays per-episode series.
impl Default for DisplayLogger {
    fn default() -> Self {
        Self::new(["reward/"])
    }
}

impl StatsLogger for DisplayLogger {
    fn log_scalar(&mut self, tag: &str, value: f64, index: u64) {
        if self.shows(tag) {
            eprintln!(
                "{:<28} {:>8} {}",
                Paint::cyan(tag),
                Paint::new(format!("#{}", index)).dimmed(),
                Paint::new(format!("{:.4}", value)).bold()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shows_episode_series() {
        let logger = DisplayLogger::default();
        assert!(logger.shows("reward/train"));
        assert!(!logger.shows("loss/policy"));
    }

    #[test]
    fn custom_prefixes() {
        let logger = DisplayLogger::new(["loss/", "entropy"]);
        assert!(logger.shows("loss/critic_1"));
        assert!(logger.shows("entropy_temprature/alpha"));
        assert!(!logger.shows("reward/train"));
    }
}
