//! Command-line interface
mod agent;
mod env;
mod options;
mod train;

pub use options::{Options, PolicyName};

/// Update a value in-place from a source.
pub trait Update<T> {
    fn update(&mut self, source: T);
}

/// Update a value from a source, returning the updated value.
pub trait WithUpdate<T> {
    fn with_update(self, source: T) -> Self;
}

impl<T, U: Update<T>> WithUpdate<T> for U {
    fn with_update(mut self, source: T) -> Self {
        self.update(source);
        self
    }
}
