//! # ql-methods
//!
//! Numerical methods that turn a process model into simulated values.
//!
//! # Modules
//!
//! * [`monte_carlo`] — Euler scheme, the Monte Carlo simulation contracts,
//!   and the Black-Scholes asset simulation built on them

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Monte Carlo simulation: discretization scheme and simulation models.
pub mod monte_carlo;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use monte_carlo::{
    AssetModelMonteCarloSimulation, BlackScholesSimulationConfig, EulerScheme,
    MonteCarloBlackScholesModel, MonteCarloSimulationModel, TimeGridConfig,
};
