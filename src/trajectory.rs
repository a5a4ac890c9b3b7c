//! The result of one simulation run: aligned time, `S`, `I` and `R` sequences.
//!
//! A `Trajectory` is built by an integrator and never mutated afterwards; the accessors hand out
//! read-only slices. The analysis helpers compute the series and annotations the visualization
//! stage plots (proportions, cumulative cases, peak load and day-over-day change in infectious
//! population).

use std::collections::TryReserveError;

use serde::Serialize;

use crate::integrator::Method;
use crate::model::{SirState, COMPARTMENTS};
use crate::ode::SolverStats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    method: Method,
    population: f64,
    time: Vec<f64>,
    susceptible: Vec<f64>,
    infectious: Vec<f64>,
    removed: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SolverStats>,
}

impl Trajectory {
    pub(crate) fn with_capacity(method: Method, population: f64, capacity: usize) -> Self {
        Self {
            method,
            population,
            time: Vec::with_capacity(capacity),
            susceptible: Vec::with_capacity(capacity),
            infectious: Vec::with_capacity(capacity),
            removed: Vec::with_capacity(capacity),
            stats: None,
        }
    }

    /// Like [`Trajectory::with_capacity`], but reports an allocation failure instead of
    /// aborting.
    pub(crate) fn try_with_capacity(
        method: Method,
        population: f64,
        capacity: usize,
    ) -> Result<Self, TryReserveError> {
        let mut trajectory = Self::with_capacity(method, population, 0);
        for series in [
            &mut trajectory.time,
            &mut trajectory.susceptible,
            &mut trajectory.infectious,
            &mut trajectory.removed,
        ] {
            series.try_reserve_exact(capacity)?;
        }
        Ok(trajectory)
    }

    pub(crate) fn from_samples<I>(
        method: Method,
        population: f64,
        time: Vec<f64>,
        states: I,
        stats: Option<SolverStats>,
    ) -> Self
    where
        I: IntoIterator<Item = [f64; COMPARTMENTS]>,
    {
        let mut trajectory = Self::with_capacity(method, population, time.len());
        trajectory.time = time;
        for [s, i, r] in states {
            trajectory.susceptible.push(s);
            trajectory.infectious.push(i);
            trajectory.removed.push(r);
        }
        trajectory.stats = stats;
        trajectory
    }

    pub(crate) fn push(&mut self, time: f64, state: SirState) {
        self.time.push(time);
        self.susceptible.push(state.susceptible);
        self.infectious.push(state.infectious);
        self.removed.push(state.removed);
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// The total population `N` the run was parameterized with.
    #[must_use]
    pub fn population(&self) -> f64 {
        self.population
    }

    /// Work counters, for trajectories produced by the adaptive solver.
    #[must_use]
    pub fn stats(&self) -> Option<&SolverStats> {
        self.stats.as_ref()
    }

    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    #[must_use]
    pub fn susceptible(&self) -> &[f64] {
        &self.susceptible
    }

    #[must_use]
    pub fn infectious(&self) -> &[f64] {
        &self.infectious
    }

    #[must_use]
    pub fn removed(&self) -> &[f64] {
        &self.removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// The state at sample `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn state_at(&self, index: usize) -> SirState {
        SirState::new(
            self.susceptible[index],
            self.infectious[index],
            self.removed[index],
        )
    }

    #[must_use]
    pub fn final_state(&self) -> Option<SirState> {
        self.len().checked_sub(1).map(|last| self.state_at(last))
    }

    /// Iterates over `(time, state)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, SirState)> + '_ {
        (0..self.len()).map(|k| (self.time[k], self.state_at(k)))
    }

    /// `S/N`, `I/N` and `R/N` for every sample.
    #[must_use]
    pub fn proportions(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let n = self.population;
        (
            self.susceptible.iter().map(|s| s / n).collect(),
            self.infectious.iter().map(|i| i / n).collect(),
            self.removed.iter().map(|r| r / n).collect(),
        )
    }

    /// Time and value of the largest infectious count. Ties resolve to the earliest sample.
    #[must_use]
    pub fn peak_infectious(&self) -> Option<(f64, f64)> {
        let mut peak: Option<(f64, f64)> = None;
        for (&t, &i) in self.time.iter().zip(&self.infectious) {
            match peak {
                Some((_, best)) if i <= best => {}
                _ => peak = Some((t, i)),
            }
        }
        peak
    }

    /// Cumulative cases: the largest value of `R` over the run.
    #[must_use]
    pub fn total_infections(&self) -> Option<f64> {
        self.removed.iter().copied().reduce(f64::max)
    }

    /// Cumulative cases as a fraction of the population.
    #[must_use]
    pub fn total_infections_fraction(&self) -> Option<f64> {
        self.total_infections().map(|r| r / self.population)
    }

    /// Change in the infectious count between consecutive samples, paired with the later
    /// sample's time. One element shorter than the trajectory.
    #[must_use]
    pub fn infectious_deltas(&self) -> Vec<(f64, f64)> {
        if self.len() < 2 {
            return Vec::new();
        }
        self.infectious
            .windows(2)
            .zip(&self.time[1..])
            .map(|(pair, &t)| (t, pair[1] - pair[0]))
            .collect()
    }

    /// Largest `|S + I + R - N|` over the run.
    #[must_use]
    pub fn max_conservation_error(&self) -> f64 {
        self.iter()
            .map(|(_, state)| (state.total() - self.population).abs())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;

    fn sample() -> Trajectory {
        let mut trajectory = Trajectory::with_capacity(Method::ForwardEuler, 100.0, 4);
        trajectory.push(0.0, SirState::new(90.0, 10.0, 0.0));
        trajectory.push(1.0, SirState::new(80.0, 15.0, 5.0));
        trajectory.push(2.0, SirState::new(72.0, 15.0, 13.0));
        trajectory.push(3.0, SirState::new(68.0, 12.0, 20.0));
        trajectory
    }

    #[test]
    fn accessors_are_aligned() {
        let trajectory = sample();
        assert_eq!(trajectory.len(), 4);
        assert_eq!(trajectory.time(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(trajectory.susceptible().len(), trajectory.removed().len());
        assert_eq!(trajectory.final_state(), Some(SirState::new(68.0, 12.0, 20.0)));
        assert!(trajectory.stats().is_none());
    }

    #[test]
    fn peak_prefers_first_occurrence() {
        assert_eq!(sample().peak_infectious(), Some((1.0, 15.0)));
    }

    #[test]
    fn cumulative_cases() {
        let trajectory = sample();
        assert_eq!(trajectory.total_infections(), Some(20.0));
        assert_almost_eq!(trajectory.total_infections_fraction().unwrap(), 0.2, 1e-15);
    }

    #[test]
    fn deltas_pair_with_later_time() {
        assert_eq!(
            sample().infectious_deltas(),
            vec![(1.0, 5.0), (2.0, 0.0), (3.0, -3.0)]
        );
    }

    #[test]
    fn proportions_divide_by_population() {
        let (s, i, r) = sample().proportions();
        assert_eq!(s[0], 0.9);
        assert_eq!(i[0], 0.1);
        assert_eq!(r[3], 0.2);
    }

    #[test]
    fn empty_trajectory_has_no_summary() {
        let trajectory = Trajectory::with_capacity(Method::AdaptiveSolver, 10.0, 0);
        assert!(trajectory.is_empty());
        assert!(trajectory.peak_infectious().is_none());
        assert!(trajectory.total_infections().is_none());
        assert!(trajectory.final_state().is_none());
        assert!(trajectory.infectious_deltas().is_empty());
        assert_eq!(trajectory.max_conservation_error(), 0.0);
    }

    #[test]
    fn unallocatable_capacity_is_reported() {
        assert!(Trajectory::try_with_capacity(Method::ForwardEuler, 10.0, usize::MAX).is_err());
        let trajectory = Trajectory::try_with_capacity(Method::ForwardEuler, 10.0, 8).unwrap();
        assert!(trajectory.is_empty());
    }

    #[test]
    fn samples_are_split_into_compartments() {
        let trajectory = Trajectory::from_samples(
            Method::AdaptiveSolver,
            10.0,
            vec![0.0, 0.5],
            [[9.0, 1.0, 0.0], [8.5, 1.2, 0.3]],
            None,
        );
        assert_eq!(trajectory.susceptible(), &[9.0, 8.5]);
        assert_eq!(trajectory.infectious(), &[1.0, 1.2]);
        assert_eq!(trajectory.removed(), &[0.0, 0.3]);
        assert!(trajectory.stats().is_none());
    }
}
