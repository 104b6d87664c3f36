//! Random number generation for stage generation
//!
//! Uses a seeded ChaCha RNG so that a given seed reproduces a stage exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stage random number generator
///
/// Wraps ChaCha8Rng. Every random draw of a generation run goes through one
/// instance of this type, in the order documented on
/// [`StageGenerator::generate_stage`](crate::StageGenerator::generate_stage).
#[derive(Debug, Clone)]
pub struct StageRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl StageRng {
    /// Seeded source; the same seed replays the same stage
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Draw a fresh seed, used when the configuration carries none
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Seed to report in logs so an odd stage can be regenerated
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1
    ///
    /// Returns 0 if n is 0.
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Returns lo..=hi
    ///
    /// Returns `lo` when the range is empty or a single value.
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Returns true with probability `p`
    ///
    /// `p` is clamped to `[0, 1]`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.gen_bool(f64::from(p.clamp(0.0, 1.0)))
    }

    /// Uniform pick, used for special-room anchors
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let len = u32::try_from(items.len()).ok().filter(|&n| n > 0)?;
        items.get(self.below(len) as usize)
    }

    /// Fisher-Yates over `below`, so direction and template order consume
    /// one draw per element after the first
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}
