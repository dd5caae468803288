//! Experience replay
mod replay;

pub use replay::ReplayBuffer;

use crate::envs::{Action, Observation};
use serde::{Deserialize, Serialize};
use std::slice;

/// A recorded environment transition.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// The initial observation.
    pub state: Observation,
    /// The action taken from the initial state.
    pub action: Action,
    /// The resulting reward.
    pub reward: f64,
    /// Observation of the resulting state.
    pub next_state: Observation,
    /// Bootstrapping weight of `next_state`.
    ///
    /// `0` if `next_state` is terminal, `1` if the episode continues past it or was only cut
    /// off by the step limit.
    pub mask: f64,
}

/// A batch of transitions sampled from replay memory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Batch {
    pub transitions: Vec<Transition>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<Transition> {
        self.transitions.iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Transition;
    type IntoIter = slice::Iter<'a, Transition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Transition> for Batch {
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        Self {
            transitions: iter.into_iter().collect(),
        }
    }
}

/// Storage of past transitions for off-policy learning.
pub trait ReplayMemory {
    /// Record a transition.
    fn push(&mut self, transition: Transition);

    /// Sample a batch of distinct stored transitions.
    ///
    /// The batch is smaller than `batch_size` if fewer transitions are stored.
    fn sample(&mut self, batch_size: usize) -> Batch;

    /// Number of stored transitions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ReplayMemory + ?Sized> ReplayMemory for &mut T {
    fn push(&mut self, transition: Transition) {
        T::push(self, transition)
    }
    fn sample(&mut self, batch_size: usize) -> Batch {
        T::sample(self, batch_size)
    }
    fn len(&self) -> usize {
        T::len(self)
    }
}

impl<T: ReplayMemory + ?Sized> ReplayMemory for Box<T> {
    fn push(&mut self, transition: Transition) {
        T::push(self, transition)
    }
    fn sample(&mut self, batch_size: usize) -> Batch {
        T::sample(self, batch_size)
    }
    fn len(&self) -> usize {
        T::len(self)
    }
}
