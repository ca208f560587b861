//! The model side of a Monte Carlo simulation.
//!
//! A model describes the SDE of its state variable `X`
//!
//! ```text
//! dXᵢ = μᵢ(t, X) dt + Σⱼ λᵢⱼ(t, X) dWⱼ,     Sᵢ = fᵢ(Xᵢ)
//! ```
//!
//! through its drift `μ`, factor loadings `λ`, and the state-space transform
//! `f` that maps the simulated state to the observable value.  Numerical
//! schemes only ever talk to a model through this trait.

use chrono::NaiveDateTime;
use ql_core::{errors::Result, Real, Time};
use ql_math::{ArrayRandomVariable, RandomVariable, RandomVariableRef};

use crate::monte_carlo_process::MonteCarloProcess;

/// Parameters of a stochastic process consumed by a numerical scheme.
pub trait ProcessModel: std::fmt::Debug + Send + Sync {
    /// Calendar date corresponding to time 0, if the model has one.
    fn reference_date(&self) -> Option<NaiveDateTime>;

    /// Number of state components.
    fn number_of_components(&self) -> usize;

    /// Number of Brownian factors driving the model.
    fn number_of_factors(&self) -> usize;

    /// Initial value of every state component.
    fn initial_state(&self) -> Vec<RandomVariableRef>;

    /// Observable value of every component at time 0.
    ///
    /// Defaults to the transformed initial state; models that know `S₀`
    /// directly return it to avoid round-off from `f(f⁻¹(S₀))`.
    fn initial_value(&self) -> Vec<RandomVariableRef> {
        self.initial_state()
            .iter()
            .enumerate()
            .map(|(component, x)| self.apply_state_space_transform(component, x.as_ref()))
            .collect()
    }

    /// Drift `μ(t, X)` of every state component.
    fn drift(&self, time: Time, state: &[RandomVariableRef]) -> Vec<RandomVariableRef>;

    /// Loadings `λᵢⱼ(t, X)` of `component` on each factor.
    fn factor_loading(
        &self,
        time: Time,
        component: usize,
        state: &[RandomVariableRef],
    ) -> Vec<RandomVariableRef>;

    /// Map a state value to the observable value, `S = f(X)`.
    fn apply_state_space_transform(
        &self,
        component: usize,
        state: &dyn RandomVariable,
    ) -> RandomVariableRef;

    /// Map an observable value to the state, `X = f⁻¹(S)`.
    fn apply_state_space_transform_inverse(
        &self,
        component: usize,
        value: &dyn RandomVariable,
    ) -> RandomVariableRef;

    /// Numeraire at `time`.  `process` gives access to the simulated state
    /// for models whose numeraire is stochastic.
    fn numeraire(&self, process: &dyn MonteCarloProcess, time: Time) -> Result<RandomVariableRef>;

    /// A path-independent random variable in the model's representation.
    fn random_variable_for_constant(&self, value: Real) -> RandomVariableRef;

    /// A random variable measurable at `time` with one value per path.
    fn random_variable_for_realizations(&self, time: Time, values: Vec<Real>) -> RandomVariableRef {
        ArrayRandomVariable::stochastic(time, values).into_ref()
    }

    /// One Euler step of the state over `[time, time + dt]`.
    ///
    /// `X + μ·dt + Σⱼ λⱼ·ΔWⱼ`
    fn evolve(
        &self,
        time: Time,
        dt: Time,
        state: &[RandomVariableRef],
        increments: &[RandomVariableRef],
    ) -> Vec<RandomVariableRef> {
        let drift = self.drift(time, state);
        (0..self.number_of_components())
            .map(|component| {
                let loadings = self.factor_loading(time, component, state);
                let mut next = state[component].add(drift[component].mult_scalar(dt).as_ref());
                for (loading, dw) in loadings.iter().zip(increments) {
                    next = next.add_product(loading.as_ref(), dw.as_ref());
                }
                next
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_math::{ArrayRandomVariable, TimeGrid};

    /// dX = 0.05·dt + 0.20·dW, S = X
    #[derive(Debug)]
    struct ConstantModel;

    fn constant(value: Real) -> RandomVariableRef {
        ArrayRandomVariable::deterministic(Real::NEG_INFINITY, value).into_ref()
    }

    impl ProcessModel for ConstantModel {
        fn reference_date(&self) -> Option<NaiveDateTime> {
            None
        }
        fn number_of_components(&self) -> usize {
            1
        }
        fn number_of_factors(&self) -> usize {
            1
        }
        fn initial_state(&self) -> Vec<RandomVariableRef> {
            vec![constant(100.0)]
        }
        fn drift(&self, _time: Time, _state: &[RandomVariableRef]) -> Vec<RandomVariableRef> {
            vec![constant(0.05)]
        }
        fn factor_loading(
            &self,
            _time: Time,
            _component: usize,
            _state: &[RandomVariableRef],
        ) -> Vec<RandomVariableRef> {
            vec![constant(0.20)]
        }
        fn apply_state_space_transform(
            &self,
            _component: usize,
            state: &dyn RandomVariable,
        ) -> RandomVariableRef {
            state.apply(&|x| x)
        }
        fn apply_state_space_transform_inverse(
            &self,
            _component: usize,
            value: &dyn RandomVariable,
        ) -> RandomVariableRef {
            value.apply(&|x| x)
        }
        fn numeraire(
            &self,
            _process: &dyn MonteCarloProcess,
            _time: Time,
        ) -> Result<RandomVariableRef> {
            Ok(constant(1.0))
        }
        fn random_variable_for_constant(&self, value: Real) -> RandomVariableRef {
            constant(value)
        }
    }

    #[test]
    fn initial_value_is_transformed_state() {
        let values = ConstantModel.initial_value();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].get(0), 100.0);
    }

    #[test]
    fn realizations_are_path_dependent() {
        let rv = ConstantModel.random_variable_for_realizations(0.5, vec![0.25; 4]);
        assert!(!rv.is_deterministic());
        assert_eq!(rv.size(), 4);
        assert_eq!(rv.filtration_time(), 0.5);
    }

    #[test]
    fn euler_step_without_noise() {
        let model = ConstantModel;
        let dw = constant(0.0);
        let next = model.evolve(0.0, 1.0, &model.initial_state(), &[dw]);
        // x + μ·Δt + σ·0 = 100.05
        assert!((next[0].get(0) - 100.05).abs() < 1e-12);
    }

    #[test]
    fn euler_step_with_noise_per_path() {
        let model = ConstantModel;
        let grid = TimeGrid::new(vec![0.0, 1.0]).unwrap();
        let dw = ArrayRandomVariable::stochastic(grid.last(), vec![1.0, -1.0]).into_ref();
        let next = model.evolve(0.0, 1.0, &model.initial_state(), &[dw]);
        // 100 + 0.05 ± 0.20
        assert!((next[0].get(0) - 100.25).abs() < 1e-12);
        assert!((next[0].get(1) - 99.85).abs() < 1e-12);
        assert_eq!(next[0].filtration_time(), 1.0);
    }
}
