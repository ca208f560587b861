//! # assetsim
//!
//! Monte Carlo simulation of a Black-Scholes asset: a log-normal model bound
//! to an Euler scheme driven by seeded Brownian increments, queried by time
//! or time index, with modified copies that share random numbers.
//!
//! This crate is a **façade** over the `ql-*` workspace crates.
//!
//! ## Quick start
//!
//! ```rust
//! use assetsim::prelude::*;
//!
//! let grid = TimeGrid::new(vec![0.0, 0.5, 1.0]).unwrap();
//! let sim = MonteCarloBlackScholesModel::with_time_grid(grid, 10_000, 100.0, 0.05, 0.2).unwrap();
//!
//! let numeraire = sim.numeraire_at_time(1.0).unwrap();
//! assert_eq!(numeraire.get(0), 0.05_f64.exp());
//!
//! // same draws, higher volatility
//! let bumped = sim
//!     .clone_with_modified_data(&ModelModifications::new().with_volatility(0.25))
//!     .unwrap();
//! let terminal = bumped.asset_value_at_time(1.0, 0).unwrap();
//! assert!(terminal.expectation() > 90.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Normal distribution, generators, Brownian motion, time grids, random
/// variables.
pub use ql_math as math;

/// Process models and the Monte Carlo process contract.
pub use ql_processes as processes;

/// Euler scheme and Monte Carlo simulations.
pub use ql_methods as methods;

/// The types and traits needed to build and query a simulation.
pub mod prelude {
    pub use ql_core::Error;
    pub use ql_math::{
        BrownianMotion, MersenneBrownianMotion, RandomVariable, RandomVariableRef, TimeGrid,
        DEFAULT_SEED,
    };
    pub use ql_methods::{
        AssetModelMonteCarloSimulation, BlackScholesSimulationConfig, EulerScheme,
        MonteCarloBlackScholesModel, MonteCarloSimulationModel, TimeGridConfig,
    };
    pub use ql_processes::{BlackScholesModel, ModelModifications, MonteCarloProcess, ProcessModel};
}
