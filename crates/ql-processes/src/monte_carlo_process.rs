//! Numerical schemes bound to a model and a driver.
//!
//! Implementations advance a [`ProcessModel`] over the time grid of their
//! [`BrownianMotion`] and expose the simulated value of every state component
//! at every grid index.

use std::sync::Arc;

use ql_core::{errors::Result, Time};
use ql_math::{BrownianMotion, RandomVariableRef, TimeGrid};

use crate::process_model::ProcessModel;

/// Simulated values of a process model on a time grid.
pub trait MonteCarloProcess: std::fmt::Debug + Send + Sync {
    /// The model being simulated.
    fn model(&self) -> &Arc<dyn ProcessModel>;

    /// The driver supplying the Brownian increments.
    fn stochastic_driver(&self) -> &Arc<dyn BrownianMotion>;

    /// Simulated value of `component` at grid index `time_index`.
    fn process_value(&self, time_index: usize, component: usize) -> Result<RandomVariableRef>;

    /// Per-path weights used when taking expectations at `time_index`.
    fn monte_carlo_weights(&self, time_index: usize) -> Result<RandomVariableRef>;

    /// The simulation time grid (the driver's grid).
    fn time_grid(&self) -> &TimeGrid {
        self.stochastic_driver().time_grid()
    }

    /// Time at grid index `time_index`.
    fn time(&self, time_index: usize) -> Option<Time> {
        self.time_grid().time(time_index)
    }

    /// Grid index of `time`, if `time` is a grid point.
    fn time_index(&self, time: Time) -> Option<usize> {
        self.time_grid().time_index(time)
    }

    /// Number of Monte Carlo paths.
    fn number_of_paths(&self) -> usize {
        self.stochastic_driver().number_of_paths()
    }

    /// Number of Brownian factors.
    fn number_of_factors(&self) -> usize {
        self.stochastic_driver().number_of_factors()
    }

    /// Number of simulated state components.
    fn number_of_components(&self) -> usize {
        self.model().number_of_components()
    }
}
