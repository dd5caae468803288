//! Reinforcement learning environment for a simulated racecar.
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::for_kv_map)] // part of warn(clippy::all), specifically style?
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)] // also triggered by macro expansions
pub mod agents;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod envs;
mod error;
pub mod gateway;
pub mod logging;
pub mod sensors;
pub mod simulation;
pub mod simulator;
pub mod spaces;
pub mod utils;

pub use agents::{Agent, RandomAgent, ReplayBuffer};
pub use config::{AgentConfig, EnvConfig, TrainConfig};
pub use envs::{EnvStructure, Environment, RacecarEnv, VehicleEnvironment};
pub use error::Error;
pub use simulation::{run, TrainingDriver};

/// Pseudo-random number generator type used by agents and environments in this crate.
pub type Prng = rand_chacha::ChaCha8Rng;
