//! Seeded Brownian increments on a time grid.
//!
//! A [`BrownianMotion`] hands out `ΔW` for every (step, factor) pair as a
//! random variable across all paths.  For a fixed grid, factor count, path
//! count and seed the stream is fully reproducible, which is what makes
//! common-random-number comparisons between two simulations possible.

use std::fmt;
use std::sync::{Arc, OnceLock};

use ql_core::{ensure, errors::Result, Error, Real};
use tracing::debug;

use super::InverseCumulativeNormalRng;
use crate::random_variable::{ArrayRandomVariableFactory, RandomVariableFactory, RandomVariableRef};
use crate::time_grid::TimeGrid;

/// Seed used when a simulation is built without an explicit driver.
pub const DEFAULT_SEED: u64 = 3141;

/// Source of independent Brownian increments.
pub trait BrownianMotion: fmt::Debug + Send + Sync {
    /// The grid the increments are defined on.
    fn time_grid(&self) -> &TimeGrid;

    /// Number of independent factors.
    fn number_of_factors(&self) -> usize;

    /// Number of Monte Carlo paths.
    fn number_of_paths(&self) -> usize;

    /// Seed of the underlying generator.
    fn seed(&self) -> u64;

    /// `W(t_{i+1}) − W(t_i)` for `factor`, across all paths.
    fn increment(&self, time_index: usize, factor: usize) -> Result<RandomVariableRef>;

    /// A deterministic random variable in the representation used for the
    /// increments.
    fn random_variable_for_constant(&self, value: Real) -> RandomVariableRef;

    /// Same grid, factors and paths with a different seed.
    fn clone_with_modified_seed(&self, seed: u64) -> Arc<dyn BrownianMotion>;

    /// Same seed, factors and paths on a different grid.
    fn clone_with_modified_time_grid(&self, time_grid: TimeGrid) -> Arc<dyn BrownianMotion>;
}

/// Brownian motion driven by a Mersenne Twister and inverse-normal mapping.
///
/// Normal draws are consumed path by path, then step by step, then factor by
/// factor, so a path's draws do not depend on the spacing of the grid.  The
/// increments are generated on first request and kept for the lifetime of the
/// instance.
#[derive(Clone)]
pub struct MersenneBrownianMotion {
    time_grid: TimeGrid,
    number_of_factors: usize,
    number_of_paths: usize,
    seed: u64,
    factory: Arc<dyn RandomVariableFactory>,
    increments: OnceLock<Vec<Vec<RandomVariableRef>>>,
}

impl fmt::Debug for MersenneBrownianMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MersenneBrownianMotion")
            .field("steps", &self.time_grid.steps())
            .field("number_of_factors", &self.number_of_factors)
            .field("number_of_paths", &self.number_of_paths)
            .field("seed", &self.seed)
            .field("generated", &self.increments.get().is_some())
            .finish()
    }
}

impl MersenneBrownianMotion {
    /// Create a driver on `time_grid`.
    ///
    /// # Arguments
    /// * `time_grid` — grid with at least one step
    /// * `number_of_factors` — independent Brownian factors (≥ 1)
    /// * `number_of_paths` — Monte Carlo paths (≥ 1)
    /// * `seed` — generator seed
    pub fn new(
        time_grid: TimeGrid,
        number_of_factors: usize,
        number_of_paths: usize,
        seed: u64,
    ) -> Result<Self> {
        ensure!(
            time_grid.steps() >= 1,
            "Brownian motion needs a time grid with at least one step"
        );
        ensure!(
            number_of_factors >= 1,
            "number of factors must be at least 1, got {number_of_factors}"
        );
        ensure!(
            number_of_paths >= 1,
            "number of paths must be at least 1, got {number_of_paths}"
        );
        debug!(
            seed,
            number_of_factors,
            number_of_paths,
            steps = time_grid.steps(),
            "created Mersenne Brownian motion"
        );
        Ok(Self {
            time_grid,
            number_of_factors,
            number_of_paths,
            seed,
            factory: Arc::new(ArrayRandomVariableFactory),
            increments: OnceLock::new(),
        })
    }

    /// Use `factory` for the increments instead of dense arrays.
    pub fn with_random_variable_factory(mut self, factory: Arc<dyn RandomVariableFactory>) -> Self {
        self.factory = factory;
        self.increments = OnceLock::new();
        self
    }

    fn with_parts(&self, time_grid: TimeGrid, seed: u64) -> Self {
        Self {
            time_grid,
            number_of_factors: self.number_of_factors,
            number_of_paths: self.number_of_paths,
            seed,
            factory: Arc::clone(&self.factory),
            increments: OnceLock::new(),
        }
    }

    fn generate(&self) -> Vec<Vec<RandomVariableRef>> {
        let steps = self.time_grid.steps();
        let (factors, paths) = (self.number_of_factors, self.number_of_paths);
        debug!(seed = self.seed, steps, factors, paths, "generating Brownian increments");

        let mut normals = vec![vec![vec![0.0; paths]; factors]; steps];
        let mut rng = InverseCumulativeNormalRng::new(self.seed);
        for path in 0..paths {
            for step in normals.iter_mut() {
                for factor in step.iter_mut() {
                    factor[path] = rng.next_real();
                }
            }
        }

        normals
            .into_iter()
            .zip(self.time_grid.dts().iter().zip(&self.time_grid.times()[1..]))
            .map(|(per_factor, (&dt, &time))| {
                let sqrt_dt = dt.sqrt();
                per_factor
                    .into_iter()
                    .map(|mut draws| {
                        draws.iter_mut().for_each(|z| *z *= sqrt_dt);
                        self.factory.create(time, draws)
                    })
                    .collect()
            })
            .collect()
    }
}

impl BrownianMotion for MersenneBrownianMotion {
    fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }

    fn number_of_factors(&self) -> usize {
        self.number_of_factors
    }

    fn number_of_paths(&self) -> usize {
        self.number_of_paths
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn increment(&self, time_index: usize, factor: usize) -> Result<RandomVariableRef> {
        let steps = self.time_grid.steps();
        if time_index >= steps {
            return Err(Error::IndexOutOfRange {
                index: time_index,
                size: steps,
            });
        }
        if factor >= self.number_of_factors {
            return Err(Error::IndexOutOfRange {
                index: factor,
                size: self.number_of_factors,
            });
        }
        let increments = self.increments.get_or_init(|| self.generate());
        Ok(Arc::clone(&increments[time_index][factor]))
    }

    fn random_variable_for_constant(&self, value: Real) -> RandomVariableRef {
        self.factory.create_constant(Real::NEG_INFINITY, value)
    }

    fn clone_with_modified_seed(&self, seed: u64) -> Arc<dyn BrownianMotion> {
        debug!(old_seed = self.seed, new_seed = seed, "re-seeding Brownian motion");
        Arc::new(self.with_parts(self.time_grid.clone(), seed))
    }

    fn clone_with_modified_time_grid(&self, time_grid: TimeGrid) -> Arc<dyn BrownianMotion> {
        debug!(
            seed = self.seed,
            old_first = self.time_grid.first(),
            new_first = time_grid.first(),
            "moving Brownian motion to a new time grid"
        );
        Arc::new(self.with_parts(time_grid, self.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::thread;

    fn grid() -> TimeGrid {
        TimeGrid::new(vec![0.0, 0.25, 1.0]).unwrap()
    }

    fn bits(rv: &RandomVariableRef, paths: usize) -> Vec<u64> {
        rv.realizations(paths).iter().map(|x| x.to_bits()).collect()
    }

    #[test]
    fn rejects_degenerate_setups() {
        assert!(MersenneBrownianMotion::new(grid(), 0, 10, 1).is_err());
        assert!(MersenneBrownianMotion::new(grid(), 1, 0, 1).is_err());
        let single = TimeGrid::new(vec![0.0]).unwrap();
        assert!(MersenneBrownianMotion::new(single, 1, 10, 1).is_err());
    }

    #[test]
    fn out_of_range_requests_fail() {
        let bm = MersenneBrownianMotion::new(grid(), 1, 10, 1).unwrap();
        assert_eq!(
            bm.increment(2, 0).unwrap_err(),
            Error::IndexOutOfRange { index: 2, size: 2 }
        );
        assert_eq!(
            bm.increment(0, 1).unwrap_err(),
            Error::IndexOutOfRange { index: 1, size: 1 }
        );
    }

    #[test]
    fn same_seed_reproduces_increments() {
        let a = MersenneBrownianMotion::new(grid(), 2, 100, 7).unwrap();
        let b = MersenneBrownianMotion::new(grid(), 2, 100, 7).unwrap();
        for t in 0..2 {
            for f in 0..2 {
                assert_eq!(bits(&a.increment(t, f).unwrap(), 100), bits(&b.increment(t, f).unwrap(), 100));
            }
        }
    }

    #[test]
    fn reseeded_clone_differs_but_keeps_shape() {
        let a = MersenneBrownianMotion::new(grid(), 1, 100, 7).unwrap();
        let b = a.clone_with_modified_seed(8);
        assert_eq!(b.seed(), 8);
        assert_eq!(b.number_of_paths(), 100);
        assert_eq!(b.number_of_factors(), 1);
        assert_eq!(b.time_grid(), a.time_grid());
        assert_ne!(bits(&a.increment(0, 0).unwrap(), 100), bits(&b.increment(0, 0).unwrap(), 100));
    }

    #[test]
    fn time_shift_keeps_draws() {
        let a = MersenneBrownianMotion::new(grid(), 1, 50, 11).unwrap();
        let b = a.clone_with_modified_time_grid(grid().time_shifted(2.0));
        assert_eq!(b.seed(), 11);
        assert_eq!(b.time_grid().first(), 2.0);
        for t in 0..2 {
            let (x, y) = (a.increment(t, 0).unwrap(), b.increment(t, 0).unwrap());
            assert_eq!(bits(&x, 50), bits(&y, 50));
            assert_eq!(y.filtration_time(), x.filtration_time() + 2.0);
        }
    }

    #[test]
    fn increments_scale_with_step() {
        let bm = MersenneBrownianMotion::new(grid(), 1, 200_000, 3141).unwrap();
        let first = bm.increment(0, 0).unwrap();
        let second = bm.increment(1, 0).unwrap();
        assert_abs_diff_eq!(first.expectation(), 0.0, epsilon = 0.01);
        assert_abs_diff_eq!(first.variance(), 0.25, epsilon = 0.01);
        assert_abs_diff_eq!(second.variance(), 0.75, epsilon = 0.02);
    }

    #[test]
    fn concurrent_readers_share_one_generation() {
        let bm = Arc::new(MersenneBrownianMotion::new(grid(), 1, 1_000, 5).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let bm = Arc::clone(&bm);
                thread::spawn(move || bm.increment(1, 0).unwrap())
            })
            .collect();
        let results: Vec<RandomVariableRef> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        for rv in &results[1..] {
            assert!(Arc::ptr_eq(rv, &results[0]));
        }
    }
}
