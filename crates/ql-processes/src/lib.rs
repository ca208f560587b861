//! # ql-processes
//!
//! Process models and the Monte Carlo process contract.
//!
//! A [`ProcessModel`] specifies the SDE of a state variable (drift, factor
//! loadings, the transform from state to observable value, the numeraire).
//! A [`MonteCarloProcess`] is a numerical scheme that advances such a model
//! over a time grid with Brownian increments.  [`BlackScholesModel`] is the
//! log-normal single-asset model; [`ModelModifications`] carries the sparse,
//! typed overrides used to derive perturbed copies of a model.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod black_scholes_model;
pub mod model_modifications;
pub mod monte_carlo_process;
pub mod process_model;

pub use black_scholes_model::BlackScholesModel;
pub use model_modifications::ModelModifications;
pub use monte_carlo_process::MonteCarloProcess;
pub use process_model::ProcessModel;
