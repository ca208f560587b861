//! Monte Carlo simulation framework.
//!
//! # Overview
//!
//! * [`EulerScheme`] — advances a process model over the grid of its driver
//! * [`MonteCarloSimulationModel`] — time, numeraire and weight queries of a
//!   simulation
//! * [`AssetModelMonteCarloSimulation`] — adds asset values and modified
//!   copies
//! * [`MonteCarloBlackScholesModel`] — single-asset Black-Scholes simulation
//! * [`BlackScholesSimulationConfig`] — serializable description of one

pub mod black_scholes;
pub mod config;
pub mod euler_scheme;
pub mod simulation_model;

pub use black_scholes::MonteCarloBlackScholesModel;
pub use config::{BlackScholesSimulationConfig, TimeGridConfig};
pub use euler_scheme::EulerScheme;
pub use simulation_model::{AssetModelMonteCarloSimulation, MonteCarloSimulationModel};
