//! Run configuration: initial compartments, rates, horizon and integration method.
//!
//! Scenarios are usually loaded from a JSON file:
//!
//! ```json
//! {
//!     "initial_susceptible": 999.0,
//!     "initial_infectious": 1.0,
//!     "initial_removed": 0.0,
//!     "beta": 0.3,
//!     "gamma": 0.1,
//!     "horizon": 160,
//!     "method": "euler"
//! }
//! ```
//!
//! `population`, `method` and `solver` are optional. When `population` is given it must equal
//! the sum of the initial compartments.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SirError;
use crate::integrator::Method;
use crate::model::{SirParameters, SirState};
use crate::numeric::{relative_eq, POPULATION_RTOL};
use crate::ode::SolverOptions;

// COVID-19 in Germany, late March 2020.
const DEFAULT_POPULATION: f64 = 82_790_000.0;
const DEFAULT_REMOVED: f64 = 30_284.0;
const DEFAULT_INFECTIOUS: f64 = 69_848.0;
const DEFAULT_GAMMA: f64 = 1.0 / 10.5;
const DEFAULT_BETA: f64 = 0.11;
const DEFAULT_HORIZON: f64 = 750.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub initial_susceptible: f64,
    pub initial_infectious: f64,
    pub initial_removed: f64,
    /// Total population. Derived from the initial compartments when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
    pub beta: f64,
    pub gamma: f64,
    /// Days to simulate.
    pub horizon: f64,
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub solver: SolverOptions,
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario::new(
            SirState::new(
                DEFAULT_POPULATION - DEFAULT_INFECTIOUS - DEFAULT_REMOVED,
                DEFAULT_INFECTIOUS,
                DEFAULT_REMOVED,
            ),
            DEFAULT_BETA,
            DEFAULT_GAMMA,
            DEFAULT_HORIZON,
        )
        .with_population(DEFAULT_POPULATION)
    }
}

impl Scenario {
    /// An adaptive-solver scenario whose population is the sum of `initial`.
    #[must_use]
    pub fn new(initial: SirState, beta: f64, gamma: f64, horizon: f64) -> Self {
        Self {
            initial_susceptible: initial.susceptible,
            initial_infectious: initial.infectious,
            initial_removed: initial.removed,
            population: None,
            beta,
            gamma,
            horizon,
            method: Method::default(),
            solver: SolverOptions::default(),
        }
    }

    #[must_use]
    pub fn with_population(mut self, population: f64) -> Self {
        self.population = Some(population);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_solver_options(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }

    /// Reads a scenario from a JSON file.
    ///
    /// # Errors
    ///
    /// `IoError` if the file cannot be read, `JsonError` if it does not describe a scenario.
    pub fn from_json_file(path: &Path) -> Result<Self, SirError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// # Errors
    ///
    /// `JsonError` if `json` does not describe a scenario.
    pub fn from_json_str(json: &str) -> Result<Self, SirError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        Ok(scenario)
    }

    #[must_use]
    pub fn initial_state(&self) -> SirState {
        SirState::new(
            self.initial_susceptible,
            self.initial_infectious,
            self.initial_removed,
        )
    }

    /// The explicit population if one was given, otherwise `S0 + I0 + R0`.
    #[must_use]
    pub fn population(&self) -> f64 {
        self.population
            .unwrap_or_else(|| self.initial_state().total())
    }

    /// Checks every input before integration starts.
    ///
    /// # Errors
    ///
    /// * `InvalidParameter` for negative or non-finite compartments or rates, a non-positive
    ///   horizon, or an explicit population that differs from `S0 + I0 + R0`.
    /// * `DegeneratePopulation` when the population is zero.
    pub fn validate(&self) -> Result<(), SirError> {
        self.parameters().map(|_| ())
    }

    /// Validates the scenario and returns the model parameters.
    ///
    /// # Errors
    ///
    /// See [`Scenario::validate`].
    pub fn parameters(&self) -> Result<SirParameters, SirError> {
        let initial = self.initial_state();
        initial.validate()?;

        let population = self.population();
        if let Some(explicit) = self.population {
            if explicit == 0.0 {
                return Err(SirError::DegeneratePopulation {
                    population: explicit,
                });
            }
            if !relative_eq(explicit, initial.total(), POPULATION_RTOL) {
                return Err(SirError::invalid(
                    "population",
                    explicit,
                    "must equal the sum of the initial compartments",
                ));
            }
        }
        let parameters = SirParameters::new(self.beta, self.gamma, population)?;

        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(SirError::invalid(
                "horizon",
                self.horizon,
                "must be positive and finite",
            ));
        }
        Ok(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_scenario_is_consistent() {
        let scenario = Scenario::default();
        assert_eq!(scenario.method, Method::AdaptiveSolver);
        assert_eq!(scenario.population(), 82_790_000.0);
        assert_eq!(scenario.initial_state().total(), 82_790_000.0);
        let parameters = scenario.parameters().unwrap();
        assert_eq!(parameters.beta, 0.11);
        assert!(parameters.basic_reproduction_number() > 1.0);
    }

    #[test]
    fn population_defaults_to_compartment_sum() {
        let scenario = Scenario::new(SirState::new(999.0, 1.0, 0.0), 0.3, 0.1, 10.0);
        assert_eq!(scenario.population(), 1000.0);
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn inconsistent_population_is_rejected() {
        let scenario = Scenario::new(SirState::new(999.0, 1.0, 0.0), 0.3, 0.1, 10.0)
            .with_population(2000.0);
        assert!(matches!(
            scenario.validate(),
            Err(SirError::InvalidParameter {
                name: "population",
                ..
            })
        ));
    }

    #[test]
    fn zero_population_is_degenerate() {
        let scenario = Scenario::new(SirState::new(0.0, 0.0, 0.0), 0.3, 0.1, 10.0);
        assert!(matches!(
            scenario.validate(),
            Err(SirError::DegeneratePopulation { .. })
        ));
    }

    #[test]
    fn non_positive_horizon_is_rejected() {
        for horizon in [0.0, -5.0, f64::INFINITY] {
            let scenario = Scenario::new(SirState::new(9.0, 1.0, 0.0), 0.3, 0.1, horizon);
            assert!(matches!(
                scenario.validate(),
                Err(SirError::InvalidParameter { name: "horizon", .. })
            ));
        }
    }

    #[test]
    fn loads_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "initial_susceptible": 999.0,
                "initial_infectious": 1.0,
                "initial_removed": 0.0,
                "beta": 0.3,
                "gamma": 0.1,
                "horizon": 160,
                "method": "euler",
                "solver": {{ "rtol": 1e-6 }}
            }}"#
        )
        .unwrap();

        let scenario = Scenario::from_json_file(file.path()).unwrap();
        assert_eq!(scenario.method, Method::ForwardEuler);
        assert_eq!(scenario.horizon, 160.0);
        assert_eq!(scenario.population, None);
        assert_eq!(scenario.solver.rtol, 1e-6);
        assert_eq!(scenario.solver.max_step, 1.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = Scenario::from_json_str(
            r#"{"initial_susceptible": 1, "initial_infectious": 1, "initial_removed": 0,
                "beta": 0.1, "gamma": 0.1, "horizon": 5, "death_rate": 0.01}"#,
        );
        assert!(matches!(result, Err(SirError::JsonError(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Scenario::from_json_file(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(SirError::IoError(_))));
    }
}
