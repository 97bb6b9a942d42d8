//! Seeded randomness shared by every stochastic step.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// RNG type owned by the engine and threaded through the pipeline.
pub type SimRng = ChaCha8Rng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Standard normal sample (Box-Muller, cosine branch).
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    const TWO_PI: f32 = std::f32::consts::TAU;
    let u1 = rng.gen::<f32>().clamp(f32::MIN_POSITIVE, 1.0);
    let u2 = rng.gen::<f32>();
    (-2.0 * u1.ln()).sqrt() * (TWO_PI * u2).cos()
}

/// Normal sample with the given mean and std, clamped to `[lo, hi]`.
pub fn clipped_normal<R: Rng + ?Sized>(rng: &mut R, mean: f32, std: f32, lo: f32, hi: f32) -> f32 {
    (mean + gaussian(rng) * std).clamp(lo, hi)
}
