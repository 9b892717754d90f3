//! Reproducible noise injection.
//!
//! Noise draws are derived from (seed, column, row) rather than from a
//! shared generator, so output is identical regardless of parallel
//! execution order.

use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Resolve the run seed: a fixed seed reproduces output exactly, no seed
/// draws a fresh one.
#[inline]
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Uniform draw in `[-amount, +amount]` for one output cell.
///
/// Each (seed, column, row) triple addresses an independent generator
/// state; `seed_from_u64` mixes the combined key through SplitMix64.
#[inline]
pub(crate) fn cell_noise(seed: u64, column: usize, row: usize, amount: f64) -> f64 {
    let key = seed
        ^ (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ ((column as u64 + 1).wrapping_mul(0xD1B5_4A32_D192_ED03));
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(key);
    rng.gen_range(-amount..=amount)
}
