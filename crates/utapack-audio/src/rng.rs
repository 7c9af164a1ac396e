//! Deterministic RNG using PCG32.
//!
//! All randomness of a run comes from one RNG handle. It is passed
//! explicitly to the shuffle step and then to every batch in order, so a
//! fixed seed reproduces the same entry order and the same tones.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use utapack_core::SeedSetting;

/// Creates a PCG32 RNG from a 64-bit seed.
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Returns the base seed for a run.
///
/// A fixed setting is used as-is. An unusable setting yields a fresh seed
/// from the operating system, so the run is not reproducible.
pub fn base_seed(setting: &SeedSetting) -> u64 {
    match setting {
        SeedSetting::Fixed(seed) => *seed,
        SeedSetting::Unseeded { .. } => rand::random(),
    }
}
