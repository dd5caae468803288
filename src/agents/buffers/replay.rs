use super::{Batch, ReplayMemory, Transition};
use crate::Prng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A fixed-capacity circular buffer of transitions.
///
/// Once full, each new transition overwrites the oldest one.
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    transitions: Vec<Transition>,
    capacity: usize,
    /// Index of the next slot to write once the buffer is full.
    position: usize,
    rng: Prng,
}

impl ReplayBuffer {
    /// Create a new `ReplayBuffer` holding at most `capacity` transitions.
    ///
    /// # Args
    /// * `capacity` - Maximum number of stored transitions.
    /// * `seed` - Seed for batch sampling.
    pub fn new(capacity: usize, seed: u64) -> Self {
        let capacity = capacity.max(1);
        Self {
            transitions: Vec::new(),
            capacity,
            position: 0,
            rng: Prng::seed_from_u64(seed),
        }
    }

    /// The transition capacity of the buffer.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterator over stored transitions in storage order.
    pub fn iter(&self) -> std::slice::Iter<Transition> {
        self.transitions.iter()
    }
}

impl ReplayMemory for ReplayBuffer {
    fn push(&mut self, transition: Transition) {
        if self.transitions.len() < self.capacity {
            self.transitions.push(transition);
        } else {
            self.transitions[self.position] = transition;
        }
        self.position = (self.position + 1) % self.capacity;
    }

    fn sample(&mut self, batch_size: usize) -> Batch {
        self.transitions
            .choose_multiple(&mut self.rng, batch_size)
            .copied()
            .collect()
    }

    fn len(&self) -> usize {
        self.transitions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::{Action, Observation};

    fn transition(reward: f64) -> Transition {
        Transition {
            state: Observation::default(),
            action: Action::default(),
            reward,
            next_state: Observation::default(),
            mask: 1.0,
        }
    }

    #[test]
    fn push_until_full() {
        let mut buffer = ReplayBuffer::new(3, 0);
        assert!(buffer.is_empty());
        buffer.push(transition(0.0));
        buffer.push(transition(1.0));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn overwrites_oldest_when_full() {
        let mut buffer = ReplayBuffer::new(3, 0);
        for i in 0..5 {
            buffer.push(transition(f64::from(i)));
        }
        assert_eq!(buffer.len(), 3);
        let rewards: Vec<_> = buffer.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![3.0, 4.0, 2.0]);
    }

    #[test]
    fn sample_distinct_transitions() {
        let mut buffer = ReplayBuffer::new(100, 1);
        for i in 0..50 {
            buffer.push(transition(f64::from(i)));
        }
        let batch = buffer.sample(20);
        assert_eq!(batch.len(), 20);
        let mut rewards: Vec<_> = batch.iter().map(|t| t.reward).collect();
        rewards.sort_by(f64::total_cmp);
        rewards.dedup();
        assert_eq!(rewards.len(), 20);
    }

    #[test]
    fn sample_more_than_stored() {
        let mut buffer = ReplayBuffer::new(10, 1);
        buffer.push(transition(1.0));
        buffer.push(transition(2.0));
        assert_eq!(buffer.sample(5).len(), 2);
    }

    #[test]
    fn sampling_is_seeded() {
        let fill = |seed| {
            let mut buffer = ReplayBuffer::new(100, seed);
            for i in 0..100 {
                buffer.push(transition(f64::from(i)));
            }
            buffer
        };
        let mut a = fill(7);
        let mut b = fill(7);
        assert_eq!(a.sample(10), b.sample(10));
    }
}
