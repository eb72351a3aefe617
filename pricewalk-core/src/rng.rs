//! Per-path random streams for simulation runs.
//!
//! One master seed fixes every path of a run: path `i` of `symbol` is seeded
//! from `blake3(master ‖ symbol ‖ i)`. A path's stream never depends on which
//! thread runs it or on how many other paths exist.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Master seed of a prediction run, recorded in its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Draw a master seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Seed of simulation path `path` for `symbol`.
    pub fn path_seed(&self, symbol: &str, path: u64) -> u64 {
        let digest = blake3::Hasher::new()
            .update(&self.master_seed.to_le_bytes())
            .update(symbol.as_bytes())
            .update(&path.to_le_bytes())
            .finalize();
        let head: [u8; 8] = digest.as_bytes()[..8].try_into().unwrap_or([0u8; 8]);
        u64::from_le_bytes(head)
    }

    pub fn path_rng(&self, symbol: &str, path: u64) -> StdRng {
        StdRng::seed_from_u64(self.path_seed(symbol, path))
    }
}
