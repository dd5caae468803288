use super::{Options, Update, WithUpdate};
use crate::config::{CheckpointName, TrainConfig};
use std::time::Duration;

impl From<&Options> for TrainConfig {
    fn from(opts: &Options) -> Self {
        Self::default().with_update(opts)
    }
}

/// Checkpoint name from an `[env_name, suffix]` pair of values.
fn checkpoint_name(values: &[String]) -> Option<CheckpointName> {
    match values {
        [env_name, suffix] => Some(CheckpointName::new(env_name.as_str(), suffix.as_str())),
        _ => None,
    }
}

impl Update<&Options> for TrainConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(seed) = opts.seed {
            self.seed = seed;
        }
        if let Some(batch_size) = opts.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(num_steps) = opts.num_steps {
            self.num_steps = num_steps;
        }
        if let Some(updates_per_step) = opts.updates_per_step {
            self.updates_per_step = updates_per_step;
        }
        if let Some(start_steps) = opts.start_steps {
            self.start_steps = start_steps;
        }
        if let Some(replay_size) = opts.replay_size {
            self.replay_size = replay_size;
        }
        if let Some(max_episode_length) = opts.max_episode_length {
            self.max_episode_length = max_episode_length;
        }
        if let Some(goal_reward_threshold) = opts.goal_reward_threshold {
            self.goal_reward_threshold = goal_reward_threshold;
        }
        if let Some(millis) = opts.control_period_ms {
            self.control_period = Duration::from_millis(millis);
        }
        if opts.no_episode_updates {
            self.update_at_episode_end = false;
        }
        if let Some(name) = opts.save_checkpoint.as_deref().and_then(checkpoint_name) {
            self.save_checkpoint = name;
        }
        if let Some(name) = opts.load_checkpoint.as_deref().and_then(checkpoint_name) {
            self.load_checkpoint = Some(name);
        }
        if let Some(ref model_dir) = opts.model_dir {
            self.model_dir = model_dir.clone();
        }
    }
}
