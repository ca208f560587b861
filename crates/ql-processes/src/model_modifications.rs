//! Sparse, typed overrides for deriving modified copies of a simulation.
//!
//! Every recognized key is an optional field, so a [`ModelModifications`]
//! value can only name keys that exist.  String-keyed input goes through
//! [`ModelModifications::from_pairs`] (or serde), and both reject unknown
//! keys.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ql_core::{errors::Result, Error, Rate, Real, Time, Volatility};

/// Key of the initial asset value override.
pub const INITIAL_VALUE: &str = "initialValue";
/// Key of the risk-free rate override.
pub const RISK_FREE_RATE: &str = "riskFreeRate";
/// Key of the volatility override.
pub const VOLATILITY: &str = "volatility";
/// Key of the seed override.
pub const SEED: &str = "seed";
/// Key of the initial time override.
pub const INITIAL_TIME: &str = "initialTime";

/// Overrides applied by `clone_with_modified_data`.
///
/// Unset fields keep the current value.
///
/// # Example
/// ```
/// use ql_processes::ModelModifications;
///
/// let bumped = ModelModifications::new().with_volatility(0.25).with_seed(7);
/// assert!(bumped.validate().is_ok());
/// assert!(ModelModifications::new().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", deny_unknown_fields))]
pub struct ModelModifications {
    /// New initial value `S₀` (positive).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub initial_value: Option<Real>,
    /// New risk-free rate `r`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub risk_free_rate: Option<Rate>,
    /// New volatility `σ` (non-negative).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub volatility: Option<Volatility>,
    /// New driver seed.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub seed: Option<u64>,
    /// New first time of the grid; the whole grid shifts with it.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub initial_time: Option<Time>,
}

impl ModelModifications {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the initial value.
    pub fn with_initial_value(mut self, initial_value: Real) -> Self {
        self.initial_value = Some(initial_value);
        self
    }

    /// Override the risk-free rate.
    pub fn with_risk_free_rate(mut self, risk_free_rate: Rate) -> Self {
        self.risk_free_rate = Some(risk_free_rate);
        self
    }

    /// Override the volatility.
    pub fn with_volatility(mut self, volatility: Volatility) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Override the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the initial time.
    pub fn with_initial_time(mut self, initial_time: Time) -> Self {
        self.initial_time = Some(initial_time);
        self
    }

    /// Whether no override is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether any override touches the model parameters.
    pub fn touches_model(&self) -> bool {
        self.initial_value.is_some() || self.risk_free_rate.is_some() || self.volatility.is_some()
    }

    /// Check every set value against its domain.
    pub fn validate(&self) -> Result<()> {
        if let Some(s0) = self.initial_value {
            if !(s0.is_finite() && s0 > 0.0) {
                return Err(Error::invalid_override(
                    INITIAL_VALUE,
                    format!("must be positive and finite, got {s0}"),
                ));
            }
        }
        if let Some(r) = self.risk_free_rate {
            if !r.is_finite() {
                return Err(Error::invalid_override(
                    RISK_FREE_RATE,
                    format!("must be finite, got {r}"),
                ));
            }
        }
        if let Some(sigma) = self.volatility {
            if !(sigma.is_finite() && sigma >= 0.0) {
                return Err(Error::invalid_override(
                    VOLATILITY,
                    format!("must be non-negative and finite, got {sigma}"),
                ));
            }
        }
        if let Some(t0) = self.initial_time {
            if !t0.is_finite() {
                return Err(Error::invalid_override(
                    INITIAL_TIME,
                    format!("must be finite, got {t0}"),
                ));
            }
        }
        Ok(())
    }

    /// Build from string keys and numeric values.
    ///
    /// Unknown or repeated keys are rejected, as is a seed that is not a
    /// non-negative integer.  The result is validated.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Real)>,
    {
        let mut modifications = Self::default();
        for (key, value) in pairs {
            let slot_taken = match key {
                INITIAL_VALUE => modifications.initial_value.replace(value).is_some(),
                RISK_FREE_RATE => modifications.risk_free_rate.replace(value).is_some(),
                VOLATILITY => modifications.volatility.replace(value).is_some(),
                INITIAL_TIME => modifications.initial_time.replace(value).is_some(),
                SEED => modifications.seed.replace(seed_from_real(value)?).is_some(),
                _ => {
                    return Err(Error::invalid_override(key, "unrecognized key"));
                }
            };
            if slot_taken {
                return Err(Error::invalid_override(key, "given more than once"));
            }
        }
        modifications.validate()?;
        Ok(modifications)
    }
}

fn seed_from_real(value: Real) -> Result<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as Real {
        Ok(value as u64)
    } else {
        Err(Error::invalid_override(
            SEED,
            format!("must be a non-negative integer, got {value}"),
        ))
    }
}
