//! Black-Scholes model in log-coordinates.
//!
//! ```text
//! dS = r S dt + σ S dW,   S(0) = S₀
//! dN = r N dt,            N(0) = 1
//! ```
//!
//! The numerical scheme simulates `X = log S`
//!
//! ```text
//! dX = (r − σ²/2) dt + σ dW,   X(0) = log S₀
//! ```
//!
//! and recovers `S = exp(X)` through the state-space transform, so an Euler
//! step on `X` is exact for constant coefficients.

use std::sync::Arc;

use chrono::NaiveDateTime;
use ql_core::{ensure, errors::Result, Error, Rate, Real, Time, Volatility};
use ql_math::{ArrayRandomVariableFactory, RandomVariable, RandomVariableFactory, RandomVariableRef};

use crate::model_modifications::ModelModifications;
use crate::monte_carlo_process::MonteCarloProcess;
use crate::process_model::ProcessModel;

/// Single-asset log-normal model with constant rate and volatility.
///
/// Immutable: parameter changes go through
/// [`clone_with_modified_data`](BlackScholesModel::clone_with_modified_data),
/// which returns a new model.
#[derive(Debug, Clone)]
pub struct BlackScholesModel {
    initial_value: Real,
    risk_free_rate: Rate,
    volatility: Volatility,
    reference_date: Option<NaiveDateTime>,
    factory: Arc<dyn RandomVariableFactory>,
}

impl BlackScholesModel {
    /// Create a new Black-Scholes model.
    ///
    /// # Arguments
    /// * `initial_value` — spot `S₀` (must be > 0)
    /// * `risk_free_rate` — continuously compounded rate `r`
    /// * `volatility` — log-volatility `σ` (must be ≥ 0)
    pub fn new(initial_value: Real, risk_free_rate: Rate, volatility: Volatility) -> Result<Self> {
        ensure!(
            initial_value.is_finite() && initial_value > 0.0,
            "initial value must be positive, got {initial_value}"
        );
        ensure!(
            risk_free_rate.is_finite(),
            "risk-free rate must be finite, got {risk_free_rate}"
        );
        ensure!(
            volatility.is_finite() && volatility >= 0.0,
            "volatility must be non-negative, got {volatility}"
        );
        Ok(Self {
            initial_value,
            risk_free_rate,
            volatility,
            reference_date: None,
            factory: Arc::new(ArrayRandomVariableFactory),
        })
    }

    /// Attach the calendar date corresponding to time 0.
    pub fn with_reference_date(mut self, reference_date: NaiveDateTime) -> Self {
        self.reference_date = Some(reference_date);
        self
    }

    /// Use `factory` for every random variable the model creates.
    pub fn with_random_variable_factory(mut self, factory: Arc<dyn RandomVariableFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Spot `S₀`.
    pub fn initial_value(&self) -> Real {
        self.initial_value
    }

    /// Risk-free rate `r`.
    pub fn risk_free_rate(&self) -> Rate {
        self.risk_free_rate
    }

    /// Volatility `σ`.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Drift of the log-price, `r − σ²/2`.
    pub fn log_drift(&self) -> Real {
        self.risk_free_rate - 0.5 * self.volatility * self.volatility
    }

    /// A copy with the model-relevant overrides applied.
    ///
    /// `seed` and `initial_time` belong to the simulation, not the model, and
    /// are ignored here.  Fails with [`Error::InvalidOverride`] before
    /// building anything if a value is out of its domain.
    pub fn clone_with_modified_data(&self, modifications: &ModelModifications) -> Result<Self> {
        modifications.validate()?;
        Ok(Self {
            initial_value: modifications.initial_value.unwrap_or(self.initial_value),
            risk_free_rate: modifications.risk_free_rate.unwrap_or(self.risk_free_rate),
            volatility: modifications.volatility.unwrap_or(self.volatility),
            reference_date: self.reference_date,
            factory: Arc::clone(&self.factory),
        })
    }
}

impl ProcessModel for BlackScholesModel {
    fn reference_date(&self) -> Option<NaiveDateTime> {
        self.reference_date
    }

    fn number_of_components(&self) -> usize {
        1
    }

    fn number_of_factors(&self) -> usize {
        1
    }

    fn initial_state(&self) -> Vec<RandomVariableRef> {
        vec![self.random_variable_for_constant(self.initial_value.ln())]
    }

    fn initial_value(&self) -> Vec<RandomVariableRef> {
        vec![self.random_variable_for_constant(self.initial_value)]
    }

    fn drift(&self, _time: Time, _state: &[RandomVariableRef]) -> Vec<RandomVariableRef> {
        vec![self.random_variable_for_constant(self.log_drift())]
    }

    fn factor_loading(
        &self,
        _time: Time,
        _component: usize,
        _state: &[RandomVariableRef],
    ) -> Vec<RandomVariableRef> {
        vec![self.random_variable_for_constant(self.volatility)]
    }

    fn apply_state_space_transform(
        &self,
        _component: usize,
        state: &dyn RandomVariable,
    ) -> RandomVariableRef {
        state.exp()
    }

    fn apply_state_space_transform_inverse(
        &self,
        _component: usize,
        value: &dyn RandomVariable,
    ) -> RandomVariableRef {
        value.log()
    }

    /// `N(t) = exp(r·t)`; defined for any finite time, on the grid or not.
    fn numeraire(&self, process: &dyn MonteCarloProcess, time: Time) -> Result<RandomVariableRef> {
        if !time.is_finite() {
            let grid = process.time_grid();
            return Err(Error::TimeOutOfRange {
                operation: "numeraire",
                time,
                first: grid.first(),
                last: grid.last(),
            });
        }
        Ok(self
            .factory
            .create_constant(time, (self.risk_free_rate * time).exp()))
    }

    fn random_variable_for_constant(&self, value: Real) -> RandomVariableRef {
        self.factory.create_constant(Real::NEG_INFINITY, value)
    }

    fn random_variable_for_realizations(&self, time: Time, values: Vec<Real>) -> RandomVariableRef {
        self.factory.create(time, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use ql_math::{BrownianMotion, MersenneBrownianMotion, TimeGrid};

    /// Minimal process giving the numeraire access to a grid.
    #[derive(Debug)]
    struct GridOnly {
        model: Arc<dyn ProcessModel>,
        driver: Arc<dyn BrownianMotion>,
    }

    impl MonteCarloProcess for GridOnly {
        fn model(&self) -> &Arc<dyn ProcessModel> {
            &self.model
        }
        fn stochastic_driver(&self) -> &Arc<dyn BrownianMotion> {
            &self.driver
        }
        fn process_value(&self, time_index: usize, _component: usize) -> Result<RandomVariableRef> {
            Err(Error::simulation("process_value", time_index, "not simulated"))
        }
        fn monte_carlo_weights(&self, time_index: usize) -> Result<RandomVariableRef> {
            Err(Error::simulation("monte_carlo_weights", time_index, "not simulated"))
        }
    }

    fn model() -> BlackScholesModel {
        BlackScholesModel::new(100.0, 0.05, 0.2).unwrap()
    }

    fn process(model: BlackScholesModel) -> GridOnly {
        let grid = TimeGrid::new(vec![0.0, 0.5, 1.0]).unwrap();
        GridOnly {
            model: Arc::new(model),
            driver: Arc::new(MersenneBrownianMotion::new(grid, 1, 10, 3141).unwrap()),
        }
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(BlackScholesModel::new(0.0, 0.05, 0.2).is_err());
        assert!(BlackScholesModel::new(100.0, Real::NAN, 0.2).is_err());
        assert!(BlackScholesModel::new(100.0, 0.05, -0.2).is_err());
        assert!(BlackScholesModel::new(100.0, 0.05, 0.0).is_ok());
    }

    #[test]
    fn log_state_coefficients() {
        let m = model();
        assert_abs_diff_eq!(m.initial_state()[0].get(0), 100.0_f64.ln(), epsilon = 1e-15);
        assert_eq!(ProcessModel::initial_value(&m)[0].get(0), 100.0);
        assert_abs_diff_eq!(m.drift(0.0, &[])[0].get(0), 0.05 - 0.02, epsilon = 1e-15);
        let loadings = m.factor_loading(0.0, 0, &[]);
        assert_eq!(loadings.len(), 1);
        assert_eq!(loadings[0].get(0), 0.2);
    }

    #[test]
    fn state_space_transform_roundtrip() {
        let m = model();
        let x = m.initial_state();
        let s = m.apply_state_space_transform(0, x[0].as_ref());
        assert_abs_diff_eq!(s.get(0), 100.0, epsilon = 1e-12);
        let back = m.apply_state_space_transform_inverse(0, s.as_ref());
        assert_abs_diff_eq!(back.get(0), x[0].get(0), epsilon = 1e-15);
    }

    #[test]
    fn numeraire_is_deterministic_exponential() {
        let m = model();
        let p = process(m.clone());
        let n = m.numeraire(&p, 1.0).unwrap();
        assert!(n.is_deterministic());
        assert_eq!(n.get(0), (0.05_f64).exp());
        // extrapolates beyond the grid
        assert_abs_diff_eq!(m.numeraire(&p, 3.0).unwrap().get(0), 0.15_f64.exp(), epsilon = 1e-15);
        assert!(matches!(
            m.numeraire(&p, Real::NAN),
            Err(Error::TimeOutOfRange { operation: "numeraire", .. })
        ));
    }

    #[test]
    fn modified_copy_leaves_original_untouched() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let m = model().with_reference_date(date);
        let bumped = m
            .clone_with_modified_data(&ModelModifications::new().with_volatility(0.3).with_seed(5))
            .unwrap();
        assert_eq!(bumped.volatility(), 0.3);
        assert_eq!(bumped.initial_value(), 100.0);
        assert_eq!(bumped.risk_free_rate(), 0.05);
        assert_eq!(bumped.reference_date(), Some(date));
        assert_eq!(m.volatility(), 0.2);
    }

    #[test]
    fn modified_copy_rejects_bad_overrides() {
        let err = model()
            .clone_with_modified_data(&ModelModifications::new().with_volatility(-1.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOverride { .. }));
    }

    #[test]
    fn constants_are_path_independent() {
        let c = model().random_variable_for_constant(2.5);
        assert!(c.is_deterministic());
        assert_eq!(c.get(123), 2.5);
    }
}
