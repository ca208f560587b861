//! Error types for the simulation workspace.
//!
//! A single `thiserror`-derived enum covers both the generic precondition
//! failures raised while building collaborators and the specific failures of
//! the simulation query surface (bad asset index, unresolvable time, failed
//! process advance, rejected override).  The `ensure!` macro defined here
//! produces the precondition variant.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },

    /// An asset index other than the ones the model simulates was requested.
    #[error("invalid asset index {index}: model simulates {number_of_assets} asset(s)")]
    InvalidAssetIndex {
        /// The requested asset index.
        index: usize,
        /// Number of assets the model simulates.
        number_of_assets: usize,
    },

    /// A time could not be resolved against the time grid.
    #[error("{operation}: time {time} outside the time grid [{first}, {last}]")]
    TimeOutOfRange {
        /// The operation that attempted the lookup.
        operation: &'static str,
        /// The requested time.
        time: f64,
        /// First time of the grid.
        first: f64,
        /// Last time of the grid.
        last: f64,
    },

    /// The simulation failed to advance the process to the requested index.
    #[error("{operation} failed at time index {time_index}: {reason}")]
    Simulation {
        /// The operation that required the simulated state.
        operation: &'static str,
        /// The requested time index.
        time_index: usize,
        /// What went wrong.
        reason: String,
    },

    /// A model override has the wrong type or lies outside its domain.
    #[error("invalid override `{key}`: {reason}")]
    InvalidOverride {
        /// The offending override key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Build an [`Error::InvalidOverride`] for `key`.
    pub fn invalid_override(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidOverride {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`Error::Simulation`] for `operation` at `time_index`.
    pub fn simulation(
        operation: &'static str,
        time_index: usize,
        reason: impl Into<String>,
    ) -> Self {
        Error::Simulation {
            operation,
            time_index,
            reason: reason.into(),
        }
    }
}

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}
