//! Process configuration.
//!
//! All values are fixed at process start.
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Configuration value outside its valid domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive and finite; got {value}")]
    NotPositive { name: &'static str, value: f64 },
}

/// Check that `value` is finite and strictly positive.
fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Configuration of the racecar environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Name of the vehicle in the simulator model states.
    pub model_name: String,
    /// Speed (m/s) commanded by a normalized speed of `1`.
    pub max_velocity: f64,
    /// Steering angle (radians) commanded by a normalized steering of `1`.
    pub max_steering: f64,
    /// Half extent of the world along x (m). Positions are normalized by this value.
    pub max_x: f64,
    /// Half extent of the world along y (m). Positions are normalized by this value.
    pub max_y: f64,
    /// Maximum range of the range sensor (m).
    pub max_range: f32,
    /// Goal position in world coordinates (m).
    pub target: (f64, f64),
    /// Normalized sector range below which the vehicle is considered crashed.
    pub collision_threshold: f32,
    /// Distance along each axis (m) within which the goal is reached.
    pub goal_distance: f64,
    /// Discount factor
    pub discount_factor: f64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            model_name: "racecar".into(),
            max_velocity: 1.0,
            max_steering: PI / 6.0,
            max_x: 20.0,
            max_y: 20.0,
            max_range: 14.0,
            target: (-8.0, 7.5),
            collision_threshold: 0.02,
            goal_distance: 0.2,
            discount_factor: 0.99,
        }
    }
}

impl EnvConfig {
    /// Check the values used as divisors when normalizing observations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_x", self.max_x)?;
        positive("max_y", self.max_y)?;
        positive("max_range", self.max_range.into())
    }

    /// Goal threshold in normalized units.
    pub fn goal_threshold(&self) -> f64 {
        self.goal_distance / self.max_x.max(self.max_y)
    }

    /// Target position in normalized units.
    pub fn normalized_target(&self) -> (f64, f64) {
        (self.target.0 / self.max_x, self.target.1 / self.max_y)
    }
}

/// Policy type of the learning agent.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    #[default]
    Gaussian,
    Deterministic,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Deterministic => f.write_str("Deterministic"),
        }
    }
}

/// Hyperparameters handed to the learning agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub policy: PolicyKind,
    /// Discount factor for reward.
    pub gamma: f64,
    /// Target smoothing coefficient.
    pub tau: f64,
    pub learning_rate: f64,
    /// Entropy temperature: relative importance of the entropy term against the reward.
    pub alpha: f64,
    /// Automatically adjust `alpha`.
    pub automatic_entropy_tuning: bool,
    pub hidden_size: usize,
    /// Number of updates per target network update.
    pub target_update_interval: u64,
    /// Evaluate the policy periodically.
    pub eval: bool,
    /// Run on CUDA.
    pub cuda: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Gaussian,
            gamma: 0.99,
            tau: 0.005,
            learning_rate: 0.0003,
            alpha: 0.2,
            automatic_entropy_tuning: false,
            hidden_size: 256,
            target_update_interval: 1,
            eval: true,
            cuda: false,
        }
    }
}

/// Names the actor and critic checkpoint files of a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckpointName {
    pub env_name: String,
    pub suffix: String,
}

impl CheckpointName {
    pub fn new<S: Into<String>, T: Into<String>>(env_name: S, suffix: T) -> Self {
        Self {
            env_name: env_name.into(),
            suffix: suffix.into(),
        }
    }
}

impl Default for CheckpointName {
    fn default() -> Self {
        Self::new("corridor_straight", "2")
    }
}

/// Configuration of the training loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Random seed
    pub seed: u64,
    /// Batch size of each parameter update.
    pub batch_size: usize,
    /// Total step budget. Training ends once it is exceeded.
    pub num_steps: u64,
    /// Model updates per environment step.
    pub updates_per_step: u64,
    /// Number of initial steps taking uniformly random actions.
    pub start_steps: u64,
    /// Capacity of the replay memory.
    pub replay_size: usize,
    /// Maximum number of steps in an episode.
    pub max_episode_length: u64,
    /// Rewards above this value count as a goal completion.
    pub goal_reward_threshold: f64,
    /// Pause after each actuation.
    pub control_period: Duration,
    /// Run parameter updates whenever an episode ends.
    pub update_at_episode_end: bool,
    /// Checkpoint saved when the step budget is exhausted.
    pub save_checkpoint: CheckpointName,
    /// Checkpoint loaded before training starts, if any.
    pub load_checkpoint: Option<CheckpointName>,
    /// Directory holding checkpoints.
    pub model_dir: String,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seed: 123_456,
            batch_size: 256,
            num_steps: 250_000,
            updates_per_step: 1,
            start_steps: 0,
            replay_size: 50_000,
            max_episode_length: 300,
            goal_reward_threshold: 9.0,
            control_period: Duration::from_millis(20),
            update_at_episode_end: true,
            save_checkpoint: CheckpointName::default(),
            load_checkpoint: None,
            model_dir: "models".into(),
        }
    }
}

impl TrainConfig {
    /// Number of parameter updates in one call of the update hook.
    pub const fn updates_per_hook(&self) -> u64 {
        self.updates_per_step * self.max_episode_length
    }
}
