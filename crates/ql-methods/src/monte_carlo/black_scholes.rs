//! Monte Carlo simulation of a single Black-Scholes asset.

use std::sync::Arc;

use chrono::NaiveDateTime;
use ql_core::{errors::Result, Error, Rate, Real, Time, Volatility};
use ql_math::{
    BrownianMotion, MersenneBrownianMotion, RandomVariableRef, TimeGrid, DEFAULT_SEED,
    TIME_TOLERANCE,
};
use ql_processes::{BlackScholesModel, ModelModifications, MonteCarloProcess, ProcessModel};
use tracing::debug;

use super::config::BlackScholesSimulationConfig;
use super::euler_scheme::EulerScheme;
use super::simulation_model::{
    grid_time, AssetModelMonteCarloSimulation, MonteCarloSimulationModel,
};

/// Black-Scholes asset simulated with an Euler scheme on `log S`.
///
/// The scheme is always bound to the very model instance held here, so the
/// model parameters this object reports are the ones its paths were
/// simulated with.  Instances are immutable; modified copies come from
/// [`clone_with_modified_data`](Self::clone_with_modified_data) and
/// [`clone_with_modified_seed`](Self::clone_with_modified_seed).
///
/// # Example
/// ```
/// use ql_math::{RandomVariable, TimeGrid};
/// use ql_methods::{AssetModelMonteCarloSimulation, MonteCarloBlackScholesModel};
///
/// let grid = TimeGrid::uniform(0.0, 4, 0.25).unwrap();
/// let sim = MonteCarloBlackScholesModel::with_time_grid(grid, 1_000, 100.0, 0.05, 0.2).unwrap();
/// let spot = sim.asset_value(0, 0).unwrap();
/// assert_eq!(spot.get(0), 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct MonteCarloBlackScholesModel {
    model: Arc<BlackScholesModel>,
    process: Arc<EulerScheme>,
}

impl MonteCarloBlackScholesModel {
    /// Simulate a Black-Scholes asset with the increments of `driver`.
    ///
    /// The driver's grid, path count and seed become those of the
    /// simulation.
    pub fn new(
        initial_value: Real,
        risk_free_rate: Rate,
        volatility: Volatility,
        driver: Arc<dyn BrownianMotion>,
    ) -> Result<Self> {
        let model = BlackScholesModel::new(initial_value, risk_free_rate, volatility)?;
        Self::with_model(model, driver)
    }

    /// Simulate on `time_grid` with a one-factor driver seeded with
    /// [`DEFAULT_SEED`].
    pub fn with_time_grid(
        time_grid: TimeGrid,
        number_of_paths: usize,
        initial_value: Real,
        risk_free_rate: Rate,
        volatility: Volatility,
    ) -> Result<Self> {
        let driver = MersenneBrownianMotion::new(time_grid, 1, number_of_paths, DEFAULT_SEED)?;
        Self::new(initial_value, risk_free_rate, volatility, Arc::new(driver))
    }

    /// Simulate an already configured `model` (e.g. one carrying a
    /// reference date) with `driver`.
    pub fn with_model(model: BlackScholesModel, driver: Arc<dyn BrownianMotion>) -> Result<Self> {
        Self::from_parts(Arc::new(model), driver)
    }

    /// Build from a configuration record.
    pub fn from_config(config: &BlackScholesSimulationConfig) -> Result<Self> {
        let time_grid = config.time_grid.build()?;
        let driver =
            MersenneBrownianMotion::new(time_grid, 1, config.number_of_paths, config.seed)?;
        let mut model =
            BlackScholesModel::new(config.initial_value, config.risk_free_rate, config.volatility)?;
        if let Some(reference_date) = config.reference_date {
            model = model.with_reference_date(reference_date);
        }
        Self::with_model(model, Arc::new(driver))
    }

    /// Bind `model` and `driver` through a new Euler scheme.
    fn from_parts(model: Arc<BlackScholesModel>, driver: Arc<dyn BrownianMotion>) -> Result<Self> {
        let process_model: Arc<dyn ProcessModel> = model.clone();
        let process = EulerScheme::new(process_model, driver)?;
        debug!(
            initial_value = model.initial_value(),
            risk_free_rate = model.risk_free_rate(),
            volatility = model.volatility(),
            seed = process.stochastic_driver().seed(),
            paths = process.number_of_paths(),
            "bound Black-Scholes model to Euler scheme"
        );
        Ok(Self {
            model,
            process: Arc::new(process),
        })
    }

    /// The model the paths are simulated with.
    pub fn model(&self) -> &Arc<BlackScholesModel> {
        &self.model
    }

    /// The underlying Euler scheme.
    pub fn process(&self) -> &Arc<EulerScheme> {
        &self.process
    }

    /// A new simulation with `modifications` applied.
    ///
    /// * Model parameters not named keep their current values; without any
    ///   model override the model itself is shared with the copy.
    /// * The driver is reused, and with it the draws, unless the seed
    ///   changes or the initial time moves; a changed seed gives a reseeded
    ///   driver, a moved initial time shifts the whole grid.
    /// * Overrides are validated before anything is built.
    pub fn clone_with_modified_data(&self, modifications: &ModelModifications) -> Result<Self> {
        modifications.validate()?;
        let model = if modifications.touches_model() {
            Arc::new(self.model.clone_with_modified_data(modifications)?)
        } else {
            Arc::clone(&self.model)
        };

        let current = self.process.stochastic_driver();
        let mut driver = match modifications.seed {
            Some(seed) if seed != current.seed() => current.clone_with_modified_seed(seed),
            _ => Arc::clone(current),
        };
        if let Some(initial_time) = modifications.initial_time {
            let shift = initial_time - driver.time_grid().first();
            if shift.abs() > TIME_TOLERANCE {
                let shifted = driver.time_grid().time_shifted(shift);
                driver = driver.clone_with_modified_time_grid(shifted);
            }
        }

        debug!(
            ?modifications,
            driver_reused = Arc::ptr_eq(&driver, current),
            "cloning Black-Scholes simulation with modified data"
        );
        Self::from_parts(model, driver)
    }

    /// A new simulation with the same model and a driver reseeded with
    /// `seed`.
    pub fn clone_with_modified_seed(&self, seed: u64) -> Result<Self> {
        debug!(seed, "cloning Black-Scholes simulation with modified seed");
        let driver = self.process.stochastic_driver().clone_with_modified_seed(seed);
        Self::from_parts(Arc::clone(&self.model), driver)
    }
}

impl MonteCarloSimulationModel for MonteCarloBlackScholesModel {
    fn time_grid(&self) -> &TimeGrid {
        self.process.time_grid()
    }

    fn number_of_paths(&self) -> usize {
        self.process.number_of_paths()
    }

    fn reference_date(&self) -> Option<NaiveDateTime> {
        self.model.reference_date()
    }

    fn numeraire(&self, time_index: usize) -> Result<RandomVariableRef> {
        let time = grid_time(self.time_grid(), "numeraire", time_index)?;
        self.model.numeraire(&*self.process, time)
    }

    fn numeraire_at_time(&self, time: Time) -> Result<RandomVariableRef> {
        self.model.numeraire(&*self.process, time)
    }

    fn monte_carlo_weights(&self, time_index: usize) -> Result<RandomVariableRef> {
        self.process.monte_carlo_weights(time_index)
    }

    fn random_variable_for_constant(&self, value: Real) -> RandomVariableRef {
        self.model.random_variable_for_constant(value)
    }
}

impl AssetModelMonteCarloSimulation for MonteCarloBlackScholesModel {
    fn number_of_assets(&self) -> usize {
        1
    }

    fn asset_value(&self, time_index: usize, asset_index: usize) -> Result<RandomVariableRef> {
        if asset_index != 0 {
            return Err(Error::InvalidAssetIndex {
                index: asset_index,
                number_of_assets: 1,
            });
        }
        self.process.process_value(time_index, 0)
    }

    fn clone_with_modified_data(
        &self,
        modifications: &ModelModifications,
    ) -> Result<Box<dyn AssetModelMonteCarloSimulation>> {
        Ok(Box::new(MonteCarloBlackScholesModel::clone_with_modified_data(
            self,
            modifications,
        )?))
    }

    fn clone_with_modified_seed(&self, seed: u64) -> Result<Box<dyn AssetModelMonteCarloSimulation>> {
        Ok(Box::new(MonteCarloBlackScholesModel::clone_with_modified_seed(self, seed)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_math::RandomVariable;

    fn grid() -> TimeGrid {
        TimeGrid::new(vec![0.0, 0.5, 1.0]).unwrap()
    }

    fn simulation() -> MonteCarloBlackScholesModel {
        MonteCarloBlackScholesModel::with_time_grid(grid(), 2_000, 100.0, 0.05, 0.2).unwrap()
    }

    fn same_object<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
        Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
    }

    #[test]
    fn scheme_is_bound_to_the_held_model() {
        let sim = simulation();
        assert!(same_object(sim.model(), sim.process().model()));
        let bumped = sim
            .clone_with_modified_data(&ModelModifications::new().with_volatility(0.3))
            .unwrap();
        assert!(same_object(bumped.model(), bumped.process().model()));
        assert_eq!(bumped.model().volatility(), 0.3);
    }

    #[test]
    fn default_seed_is_used_for_grid_construction() {
        assert_eq!(simulation().process().stochastic_driver().seed(), DEFAULT_SEED);
    }

    #[test]
    fn rejects_other_assets() {
        let err = simulation().asset_value(1, 1).unwrap_err();
        assert_eq!(err, Error::InvalidAssetIndex { index: 1, number_of_assets: 1 });
    }

    #[test]
    fn numeraire_on_and_off_grid() {
        let sim = simulation();
        assert_eq!(sim.numeraire(0).unwrap().get(0), 1.0);
        assert_eq!(sim.numeraire(2).unwrap().get(0), 0.05_f64.exp());
        assert_abs_diff_eq!(
            sim.numeraire_at_time(0.75).unwrap().get(0),
            (0.05 * 0.75_f64).exp(),
            epsilon = 1e-15
        );
        assert!(matches!(
            sim.numeraire(3),
            Err(Error::Simulation { operation: "numeraire", time_index: 3, .. })
        ));
    }

    #[test]
    fn empty_modification_keeps_the_draws() {
        let sim = simulation();
        let copy = sim.clone_with_modified_data(&ModelModifications::new()).unwrap();
        assert!(Arc::ptr_eq(
            sim.process().stochastic_driver(),
            copy.process().stochastic_driver()
        ));
        assert!(!Arc::ptr_eq(sim.process(), copy.process()));
        assert!(Arc::ptr_eq(sim.model(), copy.model()));
        let (a, b) = (sim.asset_value(2, 0).unwrap(), copy.asset_value(2, 0).unwrap());
        assert_eq!(a.realizations(2_000), b.realizations(2_000));
    }

    #[test]
    fn unchanged_seed_reuses_the_driver() {
        let sim = simulation();
        let copy = sim
            .clone_with_modified_data(&ModelModifications::new().with_seed(DEFAULT_SEED))
            .unwrap();
        assert!(Arc::ptr_eq(
            sim.process().stochastic_driver(),
            copy.process().stochastic_driver()
        ));
    }

    #[test]
    fn model_override_binds_a_new_model() {
        let sim = simulation();
        let copy = sim
            .clone_with_modified_data(&ModelModifications::new().with_risk_free_rate(0.01))
            .unwrap();
        assert!(!Arc::ptr_eq(sim.model(), copy.model()));
        assert_eq!(copy.model().risk_free_rate(), 0.01);
        assert_eq!(copy.numeraire(2).unwrap().get(0), 0.01_f64.exp());
    }

    #[test]
    fn initial_time_shifts_the_grid() {
        let sim = simulation();
        let copy = sim
            .clone_with_modified_data(&ModelModifications::new().with_initial_time(1.0))
            .unwrap();
        assert_eq!(copy.time_grid().times(), &[1.0, 1.5, 2.0]);
        assert_eq!(copy.process().stochastic_driver().seed(), DEFAULT_SEED);
        assert_eq!(sim.time_grid().first(), 0.0);
    }

    #[test]
    fn invalid_override_leaves_nothing_built() {
        let sim = simulation();
        let err = sim
            .clone_with_modified_data(&ModelModifications::new().with_initial_value(-5.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOverride { .. }));
    }

    #[test]
    fn trait_objects_clone_into_trait_objects() {
        let sim: Box<dyn AssetModelMonteCarloSimulation> = Box::new(simulation());
        let reseeded = sim.clone_with_modified_seed(7).unwrap();
        assert_eq!(reseeded.number_of_paths(), 2_000);
        assert_eq!(reseeded.number_of_assets(), 1);
        let bumped = sim
            .clone_with_modified_data(&ModelModifications::new().with_initial_value(120.0))
            .unwrap();
        assert_eq!(bumped.asset_value(0, 0).unwrap().get(0), 120.0);
    }
}
