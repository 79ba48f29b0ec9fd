//! Deterministic random number generation for demo data.
//!
//! RULE: Demo populations never call a platform RNG.
//! The same seed always produces the same customers.

use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng, SeedableRng,
};
use rand_pcg::Pcg64Mcg;

pub struct SeededRng {
    inner: Pcg64Mcg,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Uniform in [0, n). `n` must be non-zero.
    pub fn below(&mut self, n: u64) -> u64 {
        self.inner.gen_range(0..n)
    }

    /// True with probability `p`, which must lie in [0, 1].
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen_bool(p)
    }

    /// Heavy-tailed draw, never below `x_min`.
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        // gen::<f64>() is in [0, 1), so u is in (0, 1].
        let u = 1.0 - self.inner.gen::<f64>();
        x_min * u.powf(-1.0 / alpha)
    }

    pub fn pick(&mut self, weights: &WeightedIndex<f64>) -> usize {
        weights.sample(&mut self.inner)
    }
}
