#[cfg(test)]
#[path = "../../tests/unit/utils/random_test.rs"]
mod random_test;

use rand::prelude::*;
use std::cell::RefCell;

/// Provides randomized job ordering, so it can be replaced with a deterministic one in tests.
pub trait Random {
    /// Shuffles indices in range [0, size).
    fn shuffled_indices(&self, size: usize) -> Vec<usize>;
}

/// A default random implementation which uses thread local small rng.
#[derive(Default)]
pub struct DefaultRandom {}

impl Random for DefaultRandom {
    fn shuffled_indices(&self, size: usize) -> Vec<usize> {
        let mut indices = (0..size).collect::<Vec<_>>();
        DEFAULT_RNG.with(|rng| indices.shuffle(&mut *rng.borrow_mut()));

        indices
    }
}

thread_local! {
    static DEFAULT_RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_entropy());
}
