// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Injectable randomness for the draw.
//!
//! The engine never touches a global RNG. Processing order and spot picks go
//! through [`RandomSource`], so a draw is reproducible from its seed and
//! tests can substitute a deterministic source.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};

/// Source of the two random operations the engine needs.
pub trait RandomSource {
    /// Uniformly permutes `items` in place.
    fn shuffle<T>(&mut self, items: &mut [T]);

    /// Picks an index in `0..len` uniformly, or `None` when `len == 0`.
    fn pick_index(&mut self, len: usize) -> Option<usize>;

    /// Picks one element uniformly.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.pick_index(items.len())
            .and_then(|index| items.get(index))
    }
}

/// Seeded random source backed by `StdRng`.
///
/// The seed is kept so it can be written into the session settings and the
/// draw replayed.
#[derive(Debug)]
pub struct SeededRandom {
    seed: u64,
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a source from an explicit seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a source from a freshly drawn seed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random::<u64>())
    }

    /// Returns the seed this source was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        (0..len).choose(&mut self.rng)
    }
}
