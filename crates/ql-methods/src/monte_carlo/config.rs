//! Serializable description of a Black-Scholes simulation.
//!
//! ```json
//! {
//!   "timeGrid": { "uniform": { "initial": 0.0, "steps": 2, "dt": 0.5 } },
//!   "numberOfPaths": 10000,
//!   "initialValue": 100.0,
//!   "riskFreeRate": 0.05,
//!   "volatility": 0.2,
//!   "seed": 3141
//! }
//! ```

use chrono::NaiveDateTime;
use ql_core::{errors::Result, Rate, Real, Time, Volatility};
use ql_math::{TimeGrid, DEFAULT_SEED};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the simulation time grid is laid out.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum TimeGridConfig {
    /// `steps` equal steps of length `dt` starting at `initial`.
    Uniform {
        /// First grid time.
        initial: Time,
        /// Number of steps.
        steps: usize,
        /// Step length.
        dt: Time,
    },
    /// Explicit grid times.
    Explicit {
        /// Non-decreasing grid times.
        times: Vec<Time>,
    },
}

impl TimeGridConfig {
    /// Build the grid.
    pub fn build(&self) -> Result<TimeGrid> {
        match self {
            Self::Uniform { initial, steps, dt } => TimeGrid::uniform(*initial, *steps, *dt),
            Self::Explicit { times } => TimeGrid::new(times.clone()),
        }
    }
}

/// Parameters of a [`MonteCarloBlackScholesModel`](super::MonteCarloBlackScholesModel).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", deny_unknown_fields))]
pub struct BlackScholesSimulationConfig {
    /// Simulation time grid.
    pub time_grid: TimeGridConfig,
    /// Number of Monte Carlo paths.
    pub number_of_paths: usize,
    /// Spot `S₀`.
    pub initial_value: Real,
    /// Risk-free rate `r`.
    pub risk_free_rate: Rate,
    /// Volatility `σ`.
    pub volatility: Volatility,
    /// Seed of the Brownian driver.
    #[cfg_attr(feature = "serde", serde(default = "default_seed"))]
    pub seed: u64,
    /// Calendar date of time 0.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub reference_date: Option<NaiveDateTime>,
}

#[cfg(feature = "serde")]
fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl BlackScholesSimulationConfig {
    /// A configuration with the default seed and no reference date.
    pub fn new(
        time_grid: TimeGridConfig,
        number_of_paths: usize,
        initial_value: Real,
        risk_free_rate: Rate,
        volatility: Volatility,
    ) -> Self {
        Self {
            time_grid,
            number_of_paths,
            initial_value,
            risk_free_rate,
            volatility,
            seed: DEFAULT_SEED,
            reference_date: None,
        }
    }

    /// Use `seed` for the Brownian driver.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Attach the calendar date of time 0.
    pub fn with_reference_date(mut self, reference_date: NaiveDateTime) -> Self {
        self.reference_date = Some(reference_date);
        self
    }
}
