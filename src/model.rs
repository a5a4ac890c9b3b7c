//! The SIR compartmental equations.
//!
//! A population of size `N` is split into susceptible (`S`), infectious (`I`) and removed (`R`)
//! compartments. Susceptible people become infectious at rate `beta * I * S / N`, and infectious
//! people are removed at rate `gamma * I`:
//!
//! ```text
//! dS/dt = -(beta * I * S) / N
//! dI/dt =  (beta * I * S) / N - gamma * I
//! dR/dt =  gamma * I
//! ```
//!
//! The right-hand side sums to zero, so `S + I + R = N` is conserved by the exact solution.

use serde::{Deserialize, Serialize};

use crate::error::SirError;

/// The size of the state vector handed to the ODE solver.
pub const COMPARTMENTS: usize = 3;

/// Population counts (or proportions) in each compartment at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirState {
    pub susceptible: f64,
    pub infectious: f64,
    pub removed: f64,
}

impl SirState {
    #[must_use]
    pub fn new(susceptible: f64, infectious: f64, removed: f64) -> Self {
        Self {
            susceptible,
            infectious,
            removed,
        }
    }

    /// `S + I + R`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.susceptible + self.infectious + self.removed
    }

    #[must_use]
    pub fn to_array(&self) -> [f64; COMPARTMENTS] {
        [self.susceptible, self.infectious, self.removed]
    }

    #[must_use]
    pub fn from_array([susceptible, infectious, removed]: [f64; COMPARTMENTS]) -> Self {
        Self::new(susceptible, infectious, removed)
    }

    /// Checks that every compartment is finite and non-negative, and that the compartments do
    /// not sum to zero.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` naming the first offending compartment, or `DegeneratePopulation`
    /// when all compartments are zero.
    pub fn validate(&self) -> Result<(), SirError> {
        for (name, value) in [
            ("initial_susceptible", self.susceptible),
            ("initial_infectious", self.infectious),
            ("initial_removed", self.removed),
        ] {
            if !value.is_finite() {
                return Err(SirError::invalid(name, value, "must be finite"));
            }
            if value < 0.0 {
                return Err(SirError::invalid(name, value, "must be non-negative"));
            }
        }
        let population = self.total();
        if population == 0.0 {
            return Err(SirError::DegeneratePopulation { population });
        }
        Ok(())
    }
}

/// Rates and population size for one model run. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirParameters {
    /// Transmission rate per unit time.
    pub beta: f64,
    /// Recovery (removal) rate per unit time.
    pub gamma: f64,
    /// Total population `N`.
    pub population: f64,
}

impl SirParameters {
    /// Builds validated parameters.
    ///
    /// # Errors
    ///
    /// See [`SirParameters::validate`].
    pub fn new(beta: f64, gamma: f64, population: f64) -> Result<Self, SirError> {
        let parameters = Self {
            beta,
            gamma,
            population,
        };
        parameters.validate()?;
        Ok(parameters)
    }

    /// Rejects non-finite or negative rates and a population that is not strictly positive.
    ///
    /// # Errors
    ///
    /// `DegeneratePopulation` when `N == 0`, `InvalidParameter` otherwise.
    pub fn validate(&self) -> Result<(), SirError> {
        for (name, value) in [("beta", self.beta), ("gamma", self.gamma)] {
            if !value.is_finite() {
                return Err(SirError::invalid(name, value, "must be finite"));
            }
            if value < 0.0 {
                return Err(SirError::invalid(name, value, "must be non-negative"));
            }
        }
        if self.population == 0.0 {
            return Err(SirError::DegeneratePopulation {
                population: self.population,
            });
        }
        if !self.population.is_finite() || self.population < 0.0 {
            return Err(SirError::invalid(
                "population",
                self.population,
                "must be a positive finite number",
            ));
        }
        Ok(())
    }

    /// Basic reproduction number `beta / gamma`. Infinite when `gamma == 0`.
    #[must_use]
    pub fn basic_reproduction_number(&self) -> f64 {
        self.beta / self.gamma
    }

    /// Effective reproduction number `R0 * S / N` for the given state.
    #[must_use]
    pub fn effective_reproduction_number(&self, state: &SirState) -> f64 {
        self.basic_reproduction_number() * state.susceptible / self.population
    }

    /// Evaluates the right-hand side of the SIR system at `state`.
    #[must_use]
    pub fn derivatives(&self, state: &SirState) -> SirState {
        SirState::from_array(sir_derivatives(
            state.to_array(),
            self.beta,
            self.gamma,
            self.population,
        ))
    }
}

/// The SIR right-hand side `(dS/dt, dI/dt, dR/dt)` for state `[S, I, R]`.
///
/// Pure and allocation free; the adaptive solver calls it once per stage.
#[must_use]
pub fn sir_derivatives(
    [s, i, _r]: [f64; COMPARTMENTS],
    beta: f64,
    gamma: f64,
    population: f64,
) -> [f64; COMPARTMENTS] {
    let new_infections = (beta * i * s) / population;
    let removals = gamma * i;
    [-new_infections, new_infections - removals, removals]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;

    #[test]
    fn derivatives_sum_to_zero() {
        let [ds, di, dr] = sir_derivatives([990.0, 10.0, 0.0], 0.3, 0.1, 1000.0);
        assert_almost_eq!(ds, -2.97, 1e-12);
        assert_almost_eq!(di, 1.97, 1e-12);
        assert_almost_eq!(dr, 1.0, 1e-12);
        assert_almost_eq!(ds + di + dr, 0.0, 1e-12);
    }

    #[test]
    fn derivatives_vanish_without_infectious() {
        let parameters = SirParameters::new(0.5, 0.2, 100.0).unwrap();
        let rates = parameters.derivatives(&SirState::new(80.0, 0.0, 20.0));
        assert_eq!(rates, SirState::new(-0.0, 0.0, 0.0));
    }

    #[test]
    fn zero_population_is_degenerate() {
        let error = SirParameters::new(0.3, 0.1, 0.0).unwrap_err();
        assert!(matches!(error, SirError::DegeneratePopulation { .. }));

        let error = SirState::new(0.0, 0.0, 0.0).validate().unwrap_err();
        assert!(matches!(error, SirError::DegeneratePopulation { .. }));
    }

    #[test]
    fn negative_rates_are_rejected() {
        let error = SirParameters::new(-0.1, 0.1, 10.0).unwrap_err();
        assert!(matches!(
            error,
            SirError::InvalidParameter { name: "beta", .. }
        ));
        let error = SirParameters::new(0.1, f64::NAN, 10.0).unwrap_err();
        assert!(matches!(
            error,
            SirError::InvalidParameter { name: "gamma", .. }
        ));
        let error = SirParameters::new(0.1, 0.1, -10.0).unwrap_err();
        assert!(matches!(
            error,
            SirError::InvalidParameter {
                name: "population",
                ..
            }
        ));
    }

    #[test]
    fn negative_compartment_is_rejected() {
        let error = SirState::new(10.0, -1.0, 0.0).validate().unwrap_err();
        assert!(matches!(
            error,
            SirError::InvalidParameter {
                name: "initial_infectious",
                ..
            }
        ));
    }

    #[test]
    fn reproduction_numbers() {
        let parameters = SirParameters::new(0.3, 0.1, 1000.0).unwrap();
        assert_almost_eq!(parameters.basic_reproduction_number(), 3.0, 1e-12);
        let state = SirState::new(500.0, 10.0, 490.0);
        assert_almost_eq!(parameters.effective_reproduction_number(&state), 1.5, 1e-12);
    }
}
