//! Seedable randomness for piece bags, food placement and AI choices.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Random source owned by each engine.
pub type ArcadeRng = StdRng;

/// Deterministic source, for tests and replays.
pub fn seeded(seed: u64) -> ArcadeRng {
    StdRng::seed_from_u64(seed)
}

/// Source seeded from the operating system.
pub fn from_entropy() -> ArcadeRng {
    StdRng::from_entropy()
}
