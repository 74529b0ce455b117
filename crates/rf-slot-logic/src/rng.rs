//! Deterministic PRNG core handle

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// PRNG core shared by every mode of one machine
///
/// All randomness of a spin is drawn from here, so a machine seeded with the
/// same value replays the same spins.
#[derive(Debug, Clone)]
pub struct Core {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl Core {
    /// Create a reproducible core
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a core seeded from the OS entropy source
    pub fn from_os_rng() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
            seed: None,
        }
    }

    /// Seed this core was created with, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick from an empty range");
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}
