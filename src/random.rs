//! Seeded random sources.
//!
//! Every greedy run receives its generator explicitly. Multi-start derives
//! one seed per trial from a master generator so that trials never share
//! mutable random state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a reproducible generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates the master generator: seeded when `seed` is given, otherwise
/// seeded from OS entropy.
pub fn master_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Draws `count` independent trial seeds, in trial order.
pub fn trial_seeds<R: Rng>(master: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| master.random()).collect()
}
