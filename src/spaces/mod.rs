//! Spaces: runtime-defined types
mod interval;

pub use interval::IntervalSpace;

use rand::distributions::Distribution;
use std::fmt::Debug;

/// A space: a set of values with some added structure.
pub trait Space: Debug {
    type Element;

    /// Check whether a particular value is contained in the space.
    fn contains(&self, value: &Self::Element) -> bool;
}

/// A space from which samples can be drawn.
///
/// No particular distribution is specified but the distribution:
/// * must have support equal to the entire space, and
/// * should be some form of reasonable "canonical" distribution for the space.
pub trait SampleSpace: Space + Distribution<<Self as Space>::Element> {}

impl<S: Space + Distribution<<Self as Space>::Element>> SampleSpace for S {}
