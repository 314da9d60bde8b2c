//! Random sources used to perturb generated values.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Supplier of uniformly distributed floats.
pub trait RandomSource {
    /// Draw a value uniformly from `[low, high]`. Callers must pass `low <= high`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform(low, high)
    }
}

/// ChaCha8-backed [`RandomSource`].
///
/// The same seed always produces the same sequence, on every platform.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Create a source from an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }

    /// Create the source for one block of a run seeded with `seed`.
    ///
    /// Each block gets an independent stream, so results don't depend on the order in which
    /// blocks are processed.
    pub fn for_block(seed: u64, block_id: i64) -> Self {
        Self::new(block_seed(seed, block_id))
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        debug_assert!(low <= high, "uniform() called with low > high");
        if low == high {
            return low;
        }
        self.rng.random_range(low..=high)
    }
}

/// SplitMix64 finalizer over `seed` offset by the block id.
fn block_seed(seed: u64, block_id: i64) -> u64 {
    let mut z = seed.wrapping_add((block_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
