//! Uniform random variates for mission resolution
//!
//! The engine never owns a generator; callers pass one in per mission so
//! tests can replay exact draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Source of uniform variates in `[0, 1)`
pub trait RandomnessSource {
    fn next(&mut self) -> f64;
}

/// Deterministic source backed by ChaCha8
///
/// Two sources built from the same seed yield identical streams.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy, for live play
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomnessSource for SeededSource {
    fn next(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of variates
///
/// Panics when asked for more draws than were scripted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: VecDeque<f64>,
    consumed: usize,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Number of draws taken so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomnessSource for ScriptedSource {
    fn next(&mut self) -> f64 {
        let value = self
            .values
            .pop_front()
            .unwrap_or_else(|| panic!("scripted randomness exhausted after {} draws", self.consumed));
        self.consumed += 1;
        value
    }
}
