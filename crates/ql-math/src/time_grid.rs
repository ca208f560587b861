//! Time discretization used by Monte Carlo simulations.
//!
//! A [`TimeGrid`] is an ordered set of time points `t₀ < t₁ < … < tₙ`.
//! Simulated states live on the grid points; lookups resolve a time to a grid
//! index within [`TIME_TOLERANCE`].

use ql_core::{ensure, errors::Result, Real, Time};

/// Two times closer than this are the same grid point.
pub const TIME_TOLERANCE: Time = 1e-10;

/// An ordered grid of simulation times.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<Time>,
    dts: Vec<Time>,
}

impl TimeGrid {
    /// Create a grid from non-decreasing time points.
    ///
    /// Points closer than [`TIME_TOLERANCE`] to their predecessor are merged.
    pub fn new(times: Vec<Time>) -> Result<Self> {
        ensure!(!times.is_empty(), "time grid needs at least one time point");
        ensure!(
            times.iter().all(|t| t.is_finite()),
            "time grid points must be finite, got {times:?}"
        );
        ensure!(
            times.windows(2).all(|w| w[1] >= w[0]),
            "time grid points must be non-decreasing, got {times:?}"
        );

        let mut merged: Vec<Time> = Vec::with_capacity(times.len());
        for t in times {
            match merged.last() {
                Some(&last) if t - last < TIME_TOLERANCE => {}
                _ => merged.push(t),
            }
        }
        Ok(Self::from_sorted(merged))
    }

    /// Create the uniform grid `initial + i·dt` for `i = 0..=steps`.
    pub fn uniform(initial: Time, steps: usize, dt: Time) -> Result<Self> {
        ensure!(initial.is_finite(), "initial time must be finite, got {initial}");
        ensure!(
            dt.is_finite() && dt > TIME_TOLERANCE,
            "time step must be positive, got {dt}"
        );
        let times = (0..=steps).map(|i| initial + i as Real * dt).collect();
        Ok(Self::from_sorted(times))
    }

    fn from_sorted(times: Vec<Time>) -> Self {
        let dts = times.windows(2).map(|w| w[1] - w[0]).collect();
        Self { times, dts }
    }

    /// Number of time points (= steps + 1).
    pub fn size(&self) -> usize {
        self.times.len()
    }

    /// Number of steps (= time points − 1).
    pub fn steps(&self) -> usize {
        self.dts.len()
    }

    /// Time at index `i`, if it exists.
    pub fn time(&self, i: usize) -> Option<Time> {
        self.times.get(i).copied()
    }

    /// Length of step `i`, i.e. `t_{i+1} − t_i`.
    pub fn dt(&self, i: usize) -> Option<Time> {
        self.dts.get(i).copied()
    }

    /// First time point.
    pub fn first(&self) -> Time {
        self.times[0]
    }

    /// Last time point.
    pub fn last(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// All time points.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// All step lengths.
    pub fn dts(&self) -> &[Time] {
        &self.dts
    }

    /// Index of the grid point equal to `time`, if any.
    pub fn time_index(&self, time: Time) -> Option<usize> {
        let i = self.insertion_point(time);
        if i < self.times.len() && (self.times[i] - time).abs() < TIME_TOLERANCE {
            Some(i)
        } else {
            None
        }
    }

    /// Index of the last grid point with `tᵢ ≤ time`.
    pub fn time_index_nearest_less_or_equal(&self, time: Time) -> Option<usize> {
        let i = self.insertion_point(time);
        if i < self.times.len() && (self.times[i] - time).abs() < TIME_TOLERANCE {
            Some(i)
        } else {
            i.checked_sub(1)
        }
    }

    /// Index of the first grid point with `tᵢ ≥ time`.
    pub fn time_index_nearest_greater_or_equal(&self, time: Time) -> Option<usize> {
        let i = self.insertion_point(time);
        (i < self.times.len()).then_some(i)
    }

    /// The same grid with every point moved by `shift`.
    pub fn time_shifted(&self, shift: Time) -> Self {
        Self::from_sorted(self.times.iter().map(|t| t + shift).collect())
    }

    /// First index whose time is not below `time − TIME_TOLERANCE`.
    fn insertion_point(&self, time: Time) -> usize {
        self.times.partition_point(|&t| t < time - TIME_TOLERANCE)
    }
}
