//! Random number generators.
//!
//! A 64-bit Mersenne Twister (from `rand_mt`) supplies uniform deviates on
//! the open interval `(0, 1)`; [`InverseCumulativeNormalRng`] maps them to
//! standard normal draws.  [`brownian_motion`] builds seeded Brownian
//! increments on a time grid from these generators.

pub mod brownian_motion;

pub use brownian_motion::{BrownianMotion, MersenneBrownianMotion, DEFAULT_SEED};

use ql_core::Real;
use rand_mt::Mt19937GenRand64;

use crate::distributions::normal_cdf_inverse;

/// A uniform pseudo-random number generator based on the Mersenne Twister
/// MT19937-64 algorithm.
#[derive(Clone)]
pub struct MersenneTwisterUniformRng {
    seed: u64,
    rng: Mt19937GenRand64,
}

impl std::fmt::Debug for MersenneTwisterUniformRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwisterUniformRng")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl MersenneTwisterUniformRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// The seed the generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next uniform deviate in the open interval `(0, 1)`.
    ///
    /// Uses the top 53 bits, offset by half a unit so that neither end point
    /// can be produced.
    pub fn next_real(&mut self) -> Real {
        const SCALE: Real = 1.0 / (1u64 << 53) as Real;
        ((self.rng.next_u64() >> 11) as Real + 0.5) * SCALE
    }
}

/// Standard normal draws by inversion of uniform Mersenne Twister deviates.
#[derive(Debug, Clone)]
pub struct InverseCumulativeNormalRng {
    inner: MersenneTwisterUniformRng,
}

impl InverseCumulativeNormalRng {
    /// Create a new generator backed by a Mersenne Twister with the given
    /// seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: MersenneTwisterUniformRng::new(seed),
        }
    }

    /// Generate the next standard-normal deviate.
    pub fn next_real(&mut self) -> Real {
        // Uniforms are strictly inside (0, 1), where the inverse is defined.
        let u = self.inner.next_real();
        normal_cdf_inverse(u).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mt_open_interval() {
        let mut rng = MersenneTwisterUniformRng::new(42);
        for _ in 0..10_000 {
            let x = rng.next_real();
            assert!(x > 0.0 && x < 1.0);
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = InverseCumulativeNormalRng::new(3141);
        let mut b = InverseCumulativeNormalRng::new(3141);
        for _ in 0..100 {
            assert_eq!(a.next_real().to_bits(), b.next_real().to_bits());
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = InverseCumulativeNormalRng::new(1);
        let mut b = InverseCumulativeNormalRng::new(2);
        let differing = (0..100).filter(|_| a.next_real() != b.next_real()).count();
        assert!(differing > 95);
    }

    #[test]
    fn icn_rng_moments() {
        let mut rng = InverseCumulativeNormalRng::new(42);
        let n = 100_000;
        let samples: Vec<Real> = (0..n).map(|_| rng.next_real()).collect();
        let mean = samples.iter().sum::<Real>() / n as Real;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<Real>() / n as Real;
        // Standard error of the mean is ~0.003
        assert!(mean.abs() < 0.015, "mean {mean} out of expected range");
        assert!((var - 1.0).abs() < 0.02, "variance {var} out of expected range");
    }
}
