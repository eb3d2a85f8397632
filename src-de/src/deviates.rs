//! Source of random deviates used by the evolution loop.
//!
//! The solver never touches a global RNG: every draw goes through a
//! [`Deviates`] value passed in by the driver, so a fixed seed reproduces a
//! run exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Cauchy, Distribution, Normal};

use crate::distinct_indices::distinct_indices;

/// Random deviates needed by the Differential Evolution engine.
pub trait Deviates {
    /// Uniform deviate in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Normal deviate with the given mean and standard deviation.
    fn normal(&mut self, mean: f64, sd: f64) -> f64;

    /// Cauchy deviate with the given location and scale.
    fn cauchy(&mut self, location: f64, scale: f64) -> f64;

    /// `count` distinct indices from `0..pool_size`, none equal to `exclude`.
    fn distinct_indices(&mut self, pool_size: usize, count: usize, exclude: usize) -> Vec<usize>;

    /// Uniform index in `0..n`.
    fn index(&mut self, n: usize) -> usize;
}

/// [`Deviates`] backed by a seedable `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededDeviates {
    rng: StdRng,
}

impl SeededDeviates {
    /// Deterministic stream for `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Seeded stream when `seed` is given, otherwise seeded from the thread RNG.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => {
                let mut thread_rng = rand::rng();
                Self { rng: StdRng::from_rng(&mut thread_rng) }
            }
        }
    }

    /// Borrow the underlying generator, e.g. to sample an initial population.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Deviates for SeededDeviates {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        match Normal::new(mean, sd) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => mean,
        }
    }

    fn cauchy(&mut self, location: f64, scale: f64) -> f64 {
        match Cauchy::new(location, scale) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => location,
        }
    }

    fn distinct_indices(&mut self, pool_size: usize, count: usize, exclude: usize) -> Vec<usize> {
        distinct_indices(exclude, count, pool_size, &mut self.rng)
    }

    fn index(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SeededDeviates::seeded(42);
        let mut b = SeededDeviates::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.uniform(), b.uniform());
            assert_eq!(a.normal(0.5, 0.1), b.normal(0.5, 0.1));
            assert_eq!(a.cauchy(0.5, 0.1), b.cauchy(0.5, 0.1));
            assert_eq!(a.index(7), b.index(7));
            assert_eq!(a.distinct_indices(10, 3, 4), b.distinct_indices(10, 3, 4));
        }
    }

    #[test]
    fn test_ranges() {
        let mut d = SeededDeviates::seeded(1);
        for _ in 0..1000 {
            let u = d.uniform();
            assert!((0.0..1.0).contains(&u));
            assert!(d.index(3) < 3);
        }
    }

    #[test]
    fn test_normal_mean() {
        let mut d = SeededDeviates::seeded(3);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| d.normal(0.6, 0.1)).sum::<f64>() / n as f64;
        assert!((mean - 0.6).abs() < 0.01, "sample mean {}", mean);
    }

    #[test]
    fn test_cauchy_median() {
        let mut d = SeededDeviates::seeded(5);
        let mut draws: Vec<f64> = (0..10_001).map(|_| d.cauchy(0.5, 0.1)).collect();
        draws.sort_by(|a, b| a.total_cmp(b));
        let median = draws[5_000];
        assert!((median - 0.5).abs() < 0.02, "sample median {}", median);
    }

    #[test]
    fn test_degenerate_parameters_fall_back_to_location() {
        let mut d = SeededDeviates::seeded(9);
        assert_eq!(d.normal(0.3, -1.0), 0.3);
        assert_eq!(d.cauchy(0.7, 0.0), 0.7);
    }
}
