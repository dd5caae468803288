//! Reinforcement learning environments
mod encoder;
mod racecar;
#[cfg(test)]
pub mod testing;

pub use encoder::{Observation, ObservationEncoder, OBSERVATION_DIM};
pub use racecar::{Action, ActionSpace, ObservationSpace, RacecarEnv, SensorState};

use crate::sensors::SensorFrame;
use crate::spaces::Space;
use std::collections::BTreeMap;

/// The external structure of a reinforcement learning environment.
pub trait EnvStructure {
    type ObservationSpace: Space;
    type ActionSpace: Space;

    /// Space containing all possible observations.
    ///
    /// This is not required to be tight:
    /// the space may contain elements that can never be produced as a state observation.
    fn observation_space(&self) -> Self::ObservationSpace;

    /// The space of all possible actions.
    ///
    /// Every element in this space must be a valid action.
    fn action_space(&self) -> Self::ActionSpace;

    /// A lower and upper bound on possible reward values.
    ///
    /// These bounds are not required to be tight but ideally will be as tight as possible.
    fn reward_range(&self) -> (f64, f64);

    /// A discount factor applied to future rewards.
    ///
    /// A value between `0` and `1`, inclusive.
    fn discount_factor(&self) -> f64;
}

/// How a step ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The episode continues.
    Running,
    /// The vehicle left the bounded world.
    OutOfBounds,
    /// The vehicle came too close to an obstacle.
    Crashed,
    /// The vehicle reached the target.
    GoalReached,
}

impl Outcome {
    /// Whether the outcome ends the episode.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Auxiliary step information.
pub type Info = BTreeMap<String, f64>;

/// Result of an environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvStep<O> {
    /// Observation of the resulting state.
    pub observation: O,
    /// The reward value for this transition.
    pub reward: f64,
    /// Whether this step ends the episode.
    pub done: bool,
    /// Classification of the resulting state.
    pub outcome: Outcome,
    pub info: Info,
}

/// A reinforcement learning environment with internal state.
pub trait Environment: EnvStructure {
    type Observation;
    type Action;

    /// Reset the environment to an initial state.
    ///
    /// Must be called before each new episode.
    ///
    /// # Returns
    /// * `observation`: An observation of the resulting state.
    fn reset(&mut self) -> Self::Observation;

    /// Take a step in the environment.
    ///
    /// # Args
    /// * `action` - The action to apply.
    /// * `episode_steps` - Number of steps already taken in the current episode.
    ///
    /// The episode has ended if the returned step is done; call [`Environment::reset`] next.
    fn step(&mut self, action: &Self::Action, episode_steps: u64) -> EnvStep<Self::Observation>;
}

/// An environment driven by an external vehicle's sensor streams.
pub trait VehicleEnvironment: Environment {
    /// Replace the latest known sensor state.
    fn update_sensors(&mut self, frame: SensorFrame);

    /// Command the vehicle to stop.
    fn stop(&mut self);
}
