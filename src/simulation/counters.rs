/// Step, episode and update counters of a training run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EpisodeCounters {
    /// Environment steps over all episodes.
    pub total_steps: u64,
    /// Steps taken in the current episode.
    pub episode_steps: u64,
    /// Reward accumulated in the current episode.
    pub episode_reward: f64,
    /// Number of goal completions over all episodes.
    pub goals_reached: u64,
    /// Index of the current episode, starting from 1.
    pub episode: u64,
    /// Number of parameter updates performed.
    pub updates: u64,
}

impl Default for EpisodeCounters {
    fn default() -> Self {
        Self {
            total_steps: 0,
            episode_steps: 0,
            episode_reward: 0.0,
            goals_reached: 0,
            episode: 1,
            updates: 0,
        }
    }
}

impl EpisodeCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step with the given reward.
    pub fn record_step(&mut self, reward: f64) {
        self.episode_steps += 1;
        self.total_steps += 1;
        self.episode_reward += reward;
    }

    /// Advance to the next episode.
    pub fn start_episode(&mut self) {
        self.episode += 1;
        self.episode_steps = 0;
        self.episode_reward = 0.0;
    }
}
