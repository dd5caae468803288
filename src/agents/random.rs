use super::{Agent, AgentError, Batch, CheckpointPaths, UpdateLosses};
use crate::envs::{Action, ActionSpace, Observation};
use crate::Prng;
use rand::distributions::Distribution;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// An agent that always acts randomly.
///
/// Parameter updates do nothing.
/// Checkpoints hold the action space.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    action_space: ActionSpace,
    rng: Prng,
}

impl RandomAgent {
    pub fn new(action_space: ActionSpace, seed: u64) -> Self {
        Self {
            action_space,
            rng: Prng::seed_from_u64(seed),
        }
    }

    pub const fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Checkpoint {
    action_space: ActionSpace,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AgentError> {
    let io_err = |source| AgentError::Io {
        path: path.to_owned(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let data = serde_json::to_vec_pretty(value).map_err(|source| AgentError::Format {
        path: path.to_owned(),
        source,
    })?;
    fs::write(path, data).map_err(io_err)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, AgentError> {
    let data = fs::read(path).map_err(|source| AgentError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| AgentError::Format {
        path: path.to_owned(),
        source,
    })
}

impl Agent for RandomAgent {
    fn select_action(&mut self, _state: &Observation) -> Action {
        self.action_space.sample(&mut self.rng)
    }

    fn update_parameters(&mut self, _: &Batch, _: u64) -> Result<UpdateLosses, AgentError> {
        Ok(UpdateLosses::default())
    }

    fn save_model(&self, paths: &CheckpointPaths) -> Result<(), AgentError> {
        let checkpoint = Checkpoint {
            action_space: self.action_space,
        };
        write_json(&paths.actor, &checkpoint)?;
        write_json(&paths.critic, &())
    }

    fn load_model(&mut self, paths: &CheckpointPaths) -> Result<(), AgentError> {
        let checkpoint: Checkpoint = read_json(&paths.actor)?;
        read_json::<()>(&paths.critic)?;
        self.action_space = checkpoint.action_space;
        Ok(())
    }
}

impl fmt::Display for RandomAgent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "RandomAgent(speed: {}, steering: {})",
            self.action_space.speed, self.action_space.steering
        )
    }
}
