//! Command-line options
use crate::config::PolicyKind;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    version,
    author,
    about,
    after_help = "Sensor messages are read from stdin and commands written to stdout, one JSON object per line."
)]
pub struct Options {
    // Environment options
    #[arg(long, help_heading = "ENVIRONMENT OPTIONS")]
    /// Name of the vehicle in the simulator model states
    pub model_name: Option<String>,

    #[arg(long, help_heading = "ENVIRONMENT OPTIONS")]
    /// Speed (m/s) at full normalized speed
    pub max_velocity: Option<f64>,

    #[arg(long, help_heading = "ENVIRONMENT OPTIONS")]
    /// Steering angle (radians) at full normalized steering
    pub max_steering: Option<f64>,

    #[arg(long, help_heading = "ENVIRONMENT OPTIONS")]
    /// Half extent of the world along x (m)
    pub max_x: Option<f64>,

    #[arg(long, help_heading = "ENVIRONMENT OPTIONS")]
    /// Half extent of the world along y (m)
    pub max_y: Option<f64>,

    #[arg(long, help_heading = "ENVIRONMENT OPTIONS")]
    /// Maximum range of the range sensor (m)
    pub max_range: Option<f32>,

    #[arg(long, allow_negative_numbers = true, help_heading = "ENVIRONMENT OPTIONS")]
    /// Target x position (m)
    pub target_x: Option<f64>,

    #[arg(long, allow_negative_numbers = true, help_heading = "ENVIRONMENT OPTIONS")]
    /// Target y position (m)
    pub target_y: Option<f64>,

    #[arg(long, help_heading = "ENVIRONMENT OPTIONS")]
    /// Normalized obstacle range below which the vehicle has crashed
    pub collision_threshold: Option<f32>,

    #[arg(long, help_heading = "ENVIRONMENT OPTIONS")]
    /// Distance (m) along each axis within which the target is reached
    pub goal_distance: Option<f64>,

    #[arg(long, help_heading = "ENVIRONMENT OPTIONS")]
    /// Environment discount factor
    pub discount_factor: Option<f64>,

    // Agent options
    #[arg(long, value_enum, help_heading = "AGENT OPTIONS")]
    /// Policy type
    pub policy: Option<PolicyName>,

    #[arg(long, help_heading = "AGENT OPTIONS")]
    /// Discount factor for reward
    pub gamma: Option<f64>,

    #[arg(long, help_heading = "AGENT OPTIONS")]
    /// Target smoothing coefficient
    pub tau: Option<f64>,

    #[arg(long, help_heading = "AGENT OPTIONS")]
    /// Learning rate
    pub lr: Option<f64>,

    #[arg(long, help_heading = "AGENT OPTIONS")]
    /// Entropy temperature
    pub alpha: Option<f64>,

    #[arg(long, help_heading = "AGENT OPTIONS")]
    /// Automatically adjust the entropy temperature
    pub automatic_entropy_tuning: bool,

    #[arg(long, help_heading = "AGENT OPTIONS")]
    /// Hidden layer size
    pub hidden_size: Option<usize>,

    #[arg(long, help_heading = "AGENT OPTIONS")]
    /// Number of updates per target network update
    pub target_update_interval: Option<u64>,

    #[arg(long, help_heading = "AGENT OPTIONS")]
    /// Evaluate the policy periodically
    pub eval: Option<bool>,

    #[arg(long, help_heading = "AGENT OPTIONS")]
    /// Run the agent on CUDA
    pub cuda: bool,

    // Training options
    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Random seed
    pub seed: Option<u64>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Batch size of each parameter update
    pub batch_size: Option<usize>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Total number of environment steps
    pub num_steps: Option<u64>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Model updates per environment step
    pub updates_per_step: Option<u64>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Number of initial steps with uniformly random actions
    pub start_steps: Option<u64>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Capacity of the replay memory
    pub replay_size: Option<usize>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Maximum number of steps per episode
    pub max_episode_length: Option<u64>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Rewards above this value count as a goal completion
    pub goal_reward_threshold: Option<f64>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Pause (ms) after each actuation
    pub control_period_ms: Option<u64>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Do not update the agent at the end of each episode
    pub no_episode_updates: bool,

    #[arg(long, num_args = 2, value_names = ["ENV_NAME", "SUFFIX"], help_heading = "TRAINING OPTIONS")]
    /// Checkpoint name saved at the end of training
    pub save_checkpoint: Option<Vec<String>>,

    #[arg(long, num_args = 2, value_names = ["ENV_NAME", "SUFFIX"], help_heading = "TRAINING OPTIONS")]
    /// Checkpoint name loaded before training
    pub load_checkpoint: Option<Vec<String>>,

    #[arg(long, help_heading = "TRAINING OPTIONS")]
    /// Checkpoint directory
    pub model_dir: Option<String>,

    // Runtime options
    #[arg(long, default_value_t = 10, help_heading = "RUNTIME OPTIONS")]
    /// Sensor synchronizer queue size. The inbound sensor backlog holds twice this many messages
    pub sync_queue_size: usize,

    #[arg(long, default_value_t = 0.1, help_heading = "RUNTIME OPTIONS")]
    /// Maximum stamp difference (s) between synchronized sensor messages
    pub sync_slop: f64,

    #[arg(long, default_value_t = 5000, help_heading = "RUNTIME OPTIONS")]
    /// Timeout (ms) of each simulator service call
    pub service_timeout_ms: u64,

    #[arg(long, default_value = "runs", help_heading = "RUNTIME OPTIONS")]
    /// Root directory of tensorboard runs
    pub log_dir: PathBuf,
}

/// Policy type of the learning agent.
#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PolicyName {
    Gaussian,
    Deterministic,
}

impl From<PolicyName> for PolicyKind {
    fn from(name: PolicyName) -> Self {
        match name {
            PolicyName::Gaussian => Self::Gaussian,
            PolicyName::Deterministic => Self::Deterministic,
        }
    }
}
