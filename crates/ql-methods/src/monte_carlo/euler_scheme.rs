//! Euler discretization of a process model.
//!
//! ```text
//! X(t_{i+1}) = X(t_i) + μ(t_i, X) Δt_i + Σⱼ λⱼ(t_i, X) ΔWⱼ(t_i)
//! S(t_i)     = f(X(t_i))
//! ```
//!
//! The whole grid is simulated on the first request and cached; every later
//! query, from any thread, reads the same values.

use std::fmt;
use std::sync::{Arc, OnceLock};

use ql_core::{ensure, errors::Result, Error, Real};
use ql_math::{BrownianMotion, RandomVariableRef};
use ql_processes::{MonteCarloProcess, ProcessModel};
use tracing::{debug, trace, warn};

/// Simulated values, indexed `[time_index][component]`.
type Simulated = Vec<Vec<RandomVariableRef>>;

/// Euler scheme bound to one model and one Brownian driver.
///
/// The scheme's time grid, path count and seed are those of the driver.
pub struct EulerScheme {
    model: Arc<dyn ProcessModel>,
    driver: Arc<dyn BrownianMotion>,
    values: OnceLock<Result<Simulated>>,
}

impl fmt::Debug for EulerScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EulerScheme")
            .field("model", &self.model)
            .field("driver", &self.driver)
            .field("simulated", &self.values.get().is_some())
            .finish()
    }
}

impl EulerScheme {
    /// Bind `model` to `driver`.
    ///
    /// Fails if the driver provides fewer factors than the model needs.
    pub fn new(model: Arc<dyn ProcessModel>, driver: Arc<dyn BrownianMotion>) -> Result<Self> {
        ensure!(
            driver.number_of_factors() >= model.number_of_factors(),
            "model needs {} Brownian factors, driver provides {}",
            model.number_of_factors(),
            driver.number_of_factors()
        );
        Ok(Self {
            model,
            driver,
            values: OnceLock::new(),
        })
    }

    fn simulated(&self) -> Result<&Simulated> {
        self.values
            .get_or_init(|| self.simulate())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn simulate(&self) -> Result<Simulated> {
        let grid = self.driver.time_grid();
        let factors = self.model.number_of_factors();
        debug!(
            steps = grid.steps(),
            paths = self.driver.number_of_paths(),
            seed = self.driver.seed(),
            "starting Euler simulation"
        );

        let mut values = Vec::with_capacity(grid.size());
        values.push(self.checked(self.model.initial_value(), 0)?);

        let mut state = self.model.initial_state();
        for (step, (&time, &dt)) in grid.times().iter().zip(grid.dts()).enumerate() {
            let increments = (0..factors)
                .map(|factor| self.driver.increment(step, factor))
                .collect::<Result<Vec<_>>>()
                .map_err(|e| Error::simulation("process_value", step + 1, e.to_string()))?;
            state = self.model.evolve(time, dt, &state, &increments);
            let observed = state
                .iter()
                .enumerate()
                .map(|(component, x)| self.model.apply_state_space_transform(component, x.as_ref()))
                .collect();
            values.push(self.checked(observed, step + 1)?);
            trace!(step, time, dt, "advanced Euler step");
        }

        debug!(points = values.len(), "finished Euler simulation");
        Ok(values)
    }

    fn checked(
        &self,
        values: Vec<RandomVariableRef>,
        time_index: usize,
    ) -> Result<Vec<RandomVariableRef>> {
        if let Some(component) = values.iter().position(|v| !v.is_finite()) {
            warn!(time_index, component, "non-finite simulated value");
            return Err(Error::simulation(
                "process_value",
                time_index,
                format!("non-finite value in component {component}"),
            ));
        }
        Ok(values)
    }

    fn check_time_index(&self, operation: &'static str, time_index: usize) -> Result<()> {
        let size = self.driver.time_grid().size();
        if time_index >= size {
            return Err(Error::simulation(
                operation,
                time_index,
                format!("time grid has {size} points"),
            ));
        }
        Ok(())
    }
}

impl MonteCarloProcess for EulerScheme {
    fn model(&self) -> &Arc<dyn ProcessModel> {
        &self.model
    }

    fn stochastic_driver(&self) -> &Arc<dyn BrownianMotion> {
        &self.driver
    }

    fn process_value(&self, time_index: usize, component: usize) -> Result<RandomVariableRef> {
        self.check_time_index("process_value", time_index)?;
        let components = self.model.number_of_components();
        if component >= components {
            return Err(Error::simulation(
                "process_value",
                time_index,
                format!("component {component} requested, model has {components}"),
            ));
        }
        let values = self.simulated()?;
        Ok(Arc::clone(&values[time_index][component]))
    }

    /// Equal weights `1 / number_of_paths`, stored per path so that they sum
    /// to one.
    fn monte_carlo_weights(&self, time_index: usize) -> Result<RandomVariableRef> {
        self.check_time_index("monte_carlo_weights", time_index)?;
        let paths = self.driver.number_of_paths();
        let time = self.driver.time_grid().times()[time_index];
        Ok(self
            .model
            .random_variable_for_realizations(time, vec![1.0 / paths as Real; paths]))
    }
}
