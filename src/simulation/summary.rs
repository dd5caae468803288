use crate::utils::stats::OnlineMeanVariance;
use std::fmt;

/// Summary statistics of a training run.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RunSummary {
    pub total_steps: u64,
    pub goals_reached: u64,
    pub updates: u64,
    /// Whether the run ended by exhausting its step budget.
    pub budget_exhausted: bool,
    /// Total reward of each finished episode.
    pub episode_reward: OnlineMeanVariance<f64>,
    /// Length of each finished episode.
    pub episode_length: OnlineMeanVariance<f64>,
}

impl RunSummary {
    /// Number of finished episodes.
    pub const fn num_episodes(&self) -> u64 {
        self.episode_reward.count()
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn push_episode(&mut self, reward: f64, length: u64) {
        self.episode_reward.push(reward);
        self.episode_length.push(length as f64);
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "total_steps: {}", self.total_steps)?;
        writeln!(f, "num_episodes: {}", self.num_episodes())?;
        writeln!(f, "goals_reached: {}", self.goals_reached)?;
        writeln!(f, "updates: {}", self.updates)?;
        if let (Some(mean), Some(stddev)) =
            (self.episode_reward.mean(), self.episode_reward.stddev())
        {
            writeln!(f, "ep_reward_mean: {:.3} ± {:.3}", mean, stddev)?;
        }
        if let Some(mean) = self.episode_length.mean() {
            writeln!(f, "ep_length_mean: {:.1}", mean)?;
        }
        if self.budget_exhausted {
            writeln!(f, "step budget exhausted")?;
        }
        Ok(())
    }
}
