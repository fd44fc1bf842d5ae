//! Random number port.
//!
//! Every draw the engine makes goes through [`RandomSource`], so a seeded
//! `ChaCha8Rng` replays a match exactly and tests can script draws.

use rand::{Rng, RngCore};
use rand_chacha::ChaCha8Rng;

/// Default engine RNG.
pub type SimRng = ChaCha8Rng;

pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Bernoulli trial with success probability `p`.
    #[inline]
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }

    /// Uniform draw in `[lo, hi)`.
    #[inline]
    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_unit() * (hi - lo)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    #[inline]
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_unit() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

impl<R: RngCore> RandomSource for R {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Replays a fixed list of unit draws, cycling when exhausted.
    #[derive(Debug, Clone)]
    pub struct ScriptedSource {
        draws: Vec<f32>,
        cursor: usize,
    }

    impl ScriptedSource {
        pub fn new(draws: impl Into<Vec<f32>>) -> Self {
            let draws = draws.into();
            assert!(!draws.is_empty(), "scripted source needs at least one draw");
            Self { draws, cursor: 0 }
        }

        pub fn consumed(&self) -> usize {
            self.cursor
        }
    }

    impl RandomSource for ScriptedSource {
        fn next_unit(&mut self) -> f32 {
            let value = self.draws[self.cursor % self.draws.len()];
            self.cursor += 1;
            value
        }
    }
}
