//! `IntervalSpace` definition
use super::Space;
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed, bounded interval of floating-point numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalSpace<T = f64> {
    pub low: T,
    pub high: T,
}

impl<T: Float> IntervalSpace<T> {
    /// Create a new interval.
    ///
    /// # Panics
    /// If `low > high` or either bound is not finite.
    pub fn new(low: T, high: T) -> Self {
        assert!(low <= high, "require low <= high");
        assert!(low.is_finite() && high.is_finite(), "require finite bounds");
        Self { low, high }
    }

    /// Clamp a value into the interval. `NaN` is mapped to `low`.
    pub fn clamp(&self, value: T) -> T {
        if value.is_nan() {
            self.low
        } else {
            value.max(self.low).min(self.high)
        }
    }

    /// Width of the interval.
    pub fn width(&self) -> T {
        self.high - self.low
    }
}

impl<T: fmt::Display> fmt::Display for IntervalSpace<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "IntervalSpace({}, {})", self.low, self.high)
    }
}

impl<T: Float + fmt::Debug> Space for IntervalSpace<T> {
    type Element = T;

    fn contains(&self, value: &Self::Element) -> bool {
        self.low <= *value && *value <= self.high && value.is_finite()
    }
}

impl<T: Float + SampleUniform> Distribution<T> for IntervalSpace<T> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.gen_range(self.low..=self.high)
    }
}
