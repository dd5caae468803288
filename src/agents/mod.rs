//! Learning agents
mod buffers;
mod error;
mod random;

pub use buffers::{Batch, ReplayBuffer, ReplayMemory, Transition};
pub use error::AgentError;
pub use random::RandomAgent;

use crate::config::CheckpointName;
use crate::envs::{Action, Observation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Losses reported by one parameter update.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateLosses {
    pub critic_1: f64,
    pub critic_2: f64,
    pub policy: f64,
    pub entropy: f64,
    /// Entropy temperature after the update.
    pub alpha: f64,
}

/// Locations of the actor and critic parameters of a saved model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckpointPaths {
    pub actor: PathBuf,
    pub critic: PathBuf,
}

impl CheckpointPaths {
    /// Paths `{dir}/sac_actor_{env_name}_{suffix}` and `{dir}/sac_critic_{env_name}_{suffix}`.
    pub fn new<P: AsRef<Path>>(dir: P, name: &CheckpointName) -> Self {
        let dir = dir.as_ref();
        Self {
            actor: dir.join(format!("sac_actor_{}_{}", name.env_name, name.suffix)),
            critic: dir.join(format!("sac_critic_{}_{}", name.env_name, name.suffix)),
        }
    }
}

/// A learning agent.
///
/// Selects actions for observations and learns from batches of replayed transitions.
pub trait Agent {
    /// Choose an action for the given state.
    fn select_action(&mut self, state: &Observation) -> Action;

    /// Update the agent parameters from a batch of transitions.
    ///
    /// # Args
    /// * `batch` - Transitions sampled from replay memory.
    /// * `updates` - Number of updates performed before this one.
    fn update_parameters(&mut self, batch: &Batch, updates: u64)
        -> Result<UpdateLosses, AgentError>;

    /// Save the learnable parameters.
    fn save_model(&self, paths: &CheckpointPaths) -> Result<(), AgentError>;

    /// Load learnable parameters saved by [`Agent::save_model`].
    fn load_model(&mut self, paths: &CheckpointPaths) -> Result<(), AgentError>;
}

impl<T: Agent + ?Sized> Agent for &mut T {
    fn select_action(&mut self, state: &Observation) -> Action {
        T::select_action(self, state)
    }
    fn update_parameters(
        &mut self,
        batch: &Batch,
        updates: u64,
    ) -> Result<UpdateLosses, AgentError> {
        T::update_parameters(self, batch, updates)
    }
    fn save_model(&self, paths: &CheckpointPaths) -> Result<(), AgentError> {
        T::save_model(self, paths)
    }
    fn load_model(&mut self, paths: &CheckpointPaths) -> Result<(), AgentError> {
        T::load_model(self, paths)
    }
}

impl<T: Agent + ?Sized> Agent for Box<T> {
    fn select_action(&mut self, state: &Observation) -> Action {
        T::select_action(self, state)
    }
    fn update_parameters(
        &mut self,
        batch: &Batch,
        updates: u64,
    ) -> Result<UpdateLosses, AgentError> {
        T::update_parameters(self, batch, updates)
    }
    fn save_model(&self, paths: &CheckpointPaths) -> Result<(), AgentError> {
        T::save_model(self, paths)
    }
    fn load_model(&mut self, paths: &CheckpointPaths) -> Result<(), AgentError> {
        T::load_model(self, paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_paths() {
        let paths = CheckpointPaths::new("models", &CheckpointName::default());
        assert_eq!(
            paths.actor,
            Path::new("models/sac_actor_corridor_straight_2")
        );
        assert_eq!(
            paths.critic,
            Path::new("models/sac_critic_corridor_straight_2")
        );
    }
}
