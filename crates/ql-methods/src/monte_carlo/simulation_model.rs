//! Query contracts of a Monte Carlo simulation.
//!
//! [`MonteCarloSimulationModel`] covers what every simulation answers: its
//! grid, numeraire and path weights.  [`AssetModelMonteCarloSimulation`] adds
//! asset values and the derivation of modified copies.  Time-based lookups
//! are provided once here in terms of the grid.

use chrono::NaiveDateTime;
use ql_core::{errors::Result, Error, Real, Time};
use ql_math::{RandomVariableRef, TimeGrid, TIME_TOLERANCE};
use ql_processes::ModelModifications;

/// A Monte Carlo simulation on a discrete time grid.
pub trait MonteCarloSimulationModel: std::fmt::Debug + Send + Sync {
    /// The simulation time grid.
    fn time_grid(&self) -> &TimeGrid;

    /// Number of Monte Carlo paths.
    fn number_of_paths(&self) -> usize;

    /// Calendar date corresponding to time 0, if any.
    fn reference_date(&self) -> Option<NaiveDateTime>;

    /// Numeraire at the grid time of `time_index`.
    fn numeraire(&self, time_index: usize) -> Result<RandomVariableRef>;

    /// Numeraire at an arbitrary `time`, on the grid or not.
    fn numeraire_at_time(&self, time: Time) -> Result<RandomVariableRef>;

    /// Path weights at `time_index`.
    fn monte_carlo_weights(&self, time_index: usize) -> Result<RandomVariableRef>;

    /// A path-independent random variable with `value` on every path.
    fn random_variable_for_constant(&self, value: Real) -> RandomVariableRef;

    /// Time at grid index `time_index`.
    fn time(&self, time_index: usize) -> Result<Time> {
        grid_time(self.time_grid(), "time", time_index)
    }

    /// Index of the last grid time not after `time`.
    ///
    /// Fails with [`Error::TimeOutOfRange`] if `time` lies before the first
    /// or after the last grid time.
    fn time_index(&self, time: Time) -> Result<usize> {
        resolve_time_index(self.time_grid(), "time_index", time)
    }

    /// Path weights at the grid index resolved from `time`.
    fn monte_carlo_weights_at_time(&self, time: Time) -> Result<RandomVariableRef> {
        let time_index = resolve_time_index(self.time_grid(), "monte_carlo_weights_at_time", time)?;
        self.monte_carlo_weights(time_index)
    }
}

/// A Monte Carlo simulation of one or more assets.
pub trait AssetModelMonteCarloSimulation: MonteCarloSimulationModel {
    /// Number of simulated assets.
    fn number_of_assets(&self) -> usize;

    /// Value of asset `asset_index` at grid index `time_index`.
    fn asset_value(&self, time_index: usize, asset_index: usize) -> Result<RandomVariableRef>;

    /// Value of asset `asset_index` at the grid index resolved from `time`.
    fn asset_value_at_time(&self, time: Time, asset_index: usize) -> Result<RandomVariableRef> {
        let time_index = resolve_time_index(self.time_grid(), "asset_value_at_time", time)?;
        self.asset_value(time_index, asset_index)
    }

    /// A new simulation with `modifications` applied; `self` is unchanged.
    fn clone_with_modified_data(
        &self,
        modifications: &ModelModifications,
    ) -> Result<Box<dyn AssetModelMonteCarloSimulation>>;

    /// A new simulation driven by a fresh driver seeded with `seed`.
    fn clone_with_modified_seed(&self, seed: u64) -> Result<Box<dyn AssetModelMonteCarloSimulation>>;
}

/// Largest index `i` with `tᵢ ≤ time`, within grid tolerance.
/// Time at `time_index`, or [`Error::Simulation`] naming `operation` if the
/// index lies past the end of the grid.
pub(crate) fn grid_time(grid: &TimeGrid, operation: &'static str, time_index: usize) -> Result<Time> {
    grid.time(time_index).ok_or_else(|| {
        Error::simulation(
            operation,
            time_index,
            format!("time grid has {} points", grid.size()),
        )
    })
}

pub(crate) fn resolve_time_index(
    grid: &TimeGrid,
    operation: &'static str,
    time: Time,
) -> Result<usize> {
    let (first, last) = (grid.first(), grid.last());
    let out_of_range = Error::TimeOutOfRange {
        operation,
        time,
        first,
        last,
    };
    if !(time >= first - TIME_TOLERANCE && time <= last + TIME_TOLERANCE) {
        return Err(out_of_range);
    }
    grid.time_index_nearest_less_or_equal(time).ok_or(out_of_range)
}
