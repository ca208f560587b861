//! Distribution-valued quantities.
//!
//! A [`RandomVariable`] is the value of a simulated quantity across all Monte
//! Carlo paths at a given filtration time.  Consumers only see the trait, so
//! the concrete representation (a dense per-path array here) can be swapped
//! without touching the code that queries simulations.
//!
//! Arithmetic between two random variables broadcasts a deterministic operand
//! over the paths of a stochastic one.

use std::fmt;
use std::sync::Arc;

use ql_core::{Real, Time};

/// Shared, immutable handle to a random variable.
pub type RandomVariableRef = Arc<dyn RandomVariable>;

/// A quantity taking one value per Monte Carlo path.
pub trait RandomVariable: fmt::Debug + Send + Sync {
    /// Time up to which the value is measurable.  Constants report
    /// `f64::NEG_INFINITY`.
    fn filtration_time(&self) -> Time;

    /// Number of stored realizations (1 for a deterministic value).
    fn size(&self) -> usize;

    /// Whether the value is the same on every path.
    fn is_deterministic(&self) -> bool;

    /// Value on `path`.  Deterministic values ignore the index.
    fn get(&self, path: usize) -> Real;

    /// Per-path values, expanded to `number_of_paths` when deterministic.
    fn realizations(&self, number_of_paths: usize) -> Vec<Real> {
        if self.is_deterministic() {
            vec![self.get(0); number_of_paths]
        } else {
            (0..self.size()).map(|p| self.get(p)).collect()
        }
    }

    /// Sample mean across paths.
    fn expectation(&self) -> Real {
        let n = self.size();
        (0..n).map(|p| self.get(p)).sum::<Real>() / n as Real
    }

    /// Population variance across paths.
    fn variance(&self) -> Real {
        if self.is_deterministic() {
            return 0.0;
        }
        let n = self.size();
        let mean = self.expectation();
        (0..n)
            .map(|p| {
                let d = self.get(p) - mean;
                d * d
            })
            .sum::<Real>()
            / n as Real
    }

    /// Square root of [`variance`](RandomVariable::variance).
    fn standard_deviation(&self) -> Real {
        self.variance().sqrt()
    }

    /// Monte Carlo standard error of [`expectation`](RandomVariable::expectation).
    fn standard_error(&self) -> Real {
        if self.is_deterministic() {
            return 0.0;
        }
        self.standard_deviation() / (self.size() as Real).sqrt()
    }

    /// Weighted average `Σ xᵢ·wᵢ`, with `weights` typically the Monte Carlo
    /// weights of the simulation.
    ///
    /// The sum runs over the paths of whichever operand is stochastic.  A
    /// deterministic value against deterministic weights counts as a single
    /// path.
    fn average(&self, weights: &dyn RandomVariable) -> Real {
        let n = self.size().max(weights.size());
        (0..n).map(|p| self.get(p) * weights.get(p)).sum()
    }

    /// Whether every realization is finite.
    fn is_finite(&self) -> bool {
        (0..self.size()).all(|p| self.get(p).is_finite())
    }

    /// Apply `f` path by path.
    fn apply(&self, f: &dyn Fn(Real) -> Real) -> RandomVariableRef;

    /// Combine with `other` path by path.
    fn zip(&self, other: &dyn RandomVariable, f: &dyn Fn(Real, Real) -> Real)
        -> RandomVariableRef;

    /// `self + other`.
    fn add(&self, other: &dyn RandomVariable) -> RandomVariableRef {
        self.zip(other, &|a, b| a + b)
    }

    /// `self − other`.
    fn sub(&self, other: &dyn RandomVariable) -> RandomVariableRef {
        self.zip(other, &|a, b| a - b)
    }

    /// `self · other`.
    fn mult(&self, other: &dyn RandomVariable) -> RandomVariableRef {
        self.zip(other, &|a, b| a * b)
    }

    /// `self + value`.
    fn add_scalar(&self, value: Real) -> RandomVariableRef {
        self.apply(&move |x| x + value)
    }

    /// `self · value`.
    fn mult_scalar(&self, value: Real) -> RandomVariableRef {
        self.apply(&move |x| x * value)
    }

    /// `self + factor · other`, the building block of an Euler step.
    fn add_product(&self, factor: &dyn RandomVariable, other: &dyn RandomVariable)
        -> RandomVariableRef;

    /// `exp(self)`.
    fn exp(&self) -> RandomVariableRef {
        self.apply(&Real::exp)
    }

    /// `ln(self)`.
    fn log(&self) -> RandomVariableRef {
        self.apply(&Real::ln)
    }
}

// ─── Dense implementation ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Realizations {
    Deterministic(Real),
    Stochastic(Arc<[Real]>),
}

/// A random variable stored as a scalar or as one value per path.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRandomVariable {
    time: Time,
    values: Realizations,
}

impl ArrayRandomVariable {
    /// A value that is identical on every path.
    pub fn deterministic(time: Time, value: Real) -> Self {
        Self {
            time,
            values: Realizations::Deterministic(value),
        }
    }

    /// A value given path by path.  A single realization is treated as
    /// deterministic.
    pub fn stochastic(time: Time, values: Vec<Real>) -> Self {
        if values.len() == 1 {
            return Self::deterministic(time, values[0]);
        }
        Self {
            time,
            values: Realizations::Stochastic(values.into()),
        }
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> RandomVariableRef {
        Arc::new(self)
    }

    fn combine(&self, other: &dyn RandomVariable, f: impl Fn(usize, Real) -> Real) -> Self {
        let time = self.time.max(other.filtration_time());
        match (&self.values, other.is_deterministic()) {
            (Realizations::Deterministic(a), true) => Self::deterministic(time, f(0, *a)),
            (Realizations::Deterministic(a), false) => {
                Self::stochastic(time, (0..other.size()).map(|p| f(p, *a)).collect())
            }
            (Realizations::Stochastic(values), _) => Self::stochastic(
                time,
                values.iter().enumerate().map(|(p, &a)| f(p, a)).collect(),
            ),
        }
    }
}

impl RandomVariable for ArrayRandomVariable {
    fn filtration_time(&self) -> Time {
        self.time
    }

    fn size(&self) -> usize {
        match &self.values {
            Realizations::Deterministic(_) => 1,
            Realizations::Stochastic(values) => values.len(),
        }
    }

    fn is_deterministic(&self) -> bool {
        matches!(self.values, Realizations::Deterministic(_))
    }

    fn get(&self, path: usize) -> Real {
        match &self.values {
            Realizations::Deterministic(value) => *value,
            Realizations::Stochastic(values) => values[path],
        }
    }

    fn expectation(&self) -> Real {
        match &self.values {
            Realizations::Deterministic(value) => *value,
            Realizations::Stochastic(values) => {
                values.iter().sum::<Real>() / values.len() as Real
            }
        }
    }

    fn apply(&self, f: &dyn Fn(Real) -> Real) -> RandomVariableRef {
        let values = match &self.values {
            Realizations::Deterministic(value) => Realizations::Deterministic(f(*value)),
            Realizations::Stochastic(values) => {
                Realizations::Stochastic(values.iter().map(|&x| f(x)).collect())
            }
        };
        Arc::new(Self {
            time: self.time,
            values,
        })
    }

    fn zip(
        &self,
        other: &dyn RandomVariable,
        f: &dyn Fn(Real, Real) -> Real,
    ) -> RandomVariableRef {
        Arc::new(self.combine(other, |p, a| f(a, other.get(p))))
    }

    fn add_product(
        &self,
        factor: &dyn RandomVariable,
        other: &dyn RandomVariable,
    ) -> RandomVariableRef {
        if self.is_deterministic() && factor.is_deterministic() && !other.is_deterministic() {
            let (a, b) = (self.get(0), factor.get(0));
            let time = self
                .time
                .max(factor.filtration_time())
                .max(other.filtration_time());
            return Arc::new(Self::stochastic(
                time,
                (0..other.size()).map(|p| a + b * other.get(p)).collect(),
            ));
        }
        let product = factor.mult(other);
        Arc::new(self.combine(product.as_ref(), |p, a| a + product.get(p)))
    }
}

// ─── Factory ──────────────────────────────────────────────────────────────────

/// Creates random variables of one concrete representation.
pub trait RandomVariableFactory: fmt::Debug + Send + Sync {
    /// A deterministic value.
    fn create_constant(&self, time: Time, value: Real) -> RandomVariableRef;

    /// A value given path by path.
    fn create(&self, time: Time, values: Vec<Real>) -> RandomVariableRef;
}

/// Factory for [`ArrayRandomVariable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayRandomVariableFactory;

impl RandomVariableFactory for ArrayRandomVariableFactory {
    fn create_constant(&self, time: Time, value: Real) -> RandomVariableRef {
        ArrayRandomVariable::deterministic(time, value).into_ref()
    }

    fn create(&self, time: Time, values: Vec<Real>) -> RandomVariableRef {
        ArrayRandomVariable::stochastic(time, values).into_ref()
    }
}
