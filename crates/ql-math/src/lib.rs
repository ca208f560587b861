//! # ql-math
//!
//! Mathematical building blocks for Monte Carlo simulation: the standard
//! normal distribution, Mersenne Twister generators, seeded Brownian
//! increments, time grids, and the random-variable abstraction that carries
//! simulated values across paths.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Random number generators and Brownian motion.
pub mod random_numbers;

/// Distribution-valued quantities.
pub mod random_variable;

/// Time discretization.
pub mod time_grid;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use random_numbers::{BrownianMotion, MersenneBrownianMotion, DEFAULT_SEED};
pub use random_variable::{
    ArrayRandomVariable, ArrayRandomVariableFactory, RandomVariable, RandomVariableFactory,
    RandomVariableRef,
};
pub use time_grid::{TimeGrid, TIME_TOLERANCE};
