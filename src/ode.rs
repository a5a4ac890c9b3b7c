//! Settings and work counters for the adaptive Dormand-Prince solve.
//!
//! The stepping itself is done by [`ode_solvers::dopri5::Dopri5`]; this module holds the
//! scenario-level knobs that are passed to it and the statistics read back from it.

use ode_solvers::dop_shared::Stats;
use serde::{Deserialize, Serialize};

use crate::error::SirError;

/// Step-size and tolerance settings for the adaptive solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Size of the first attempted step.
    pub first_step: f64,
    /// Upper bound on every step.
    pub max_step: f64,
    /// Relative error tolerance.
    pub rtol: f64,
    /// Absolute error tolerance.
    pub atol: f64,
    /// Maximum number of attempted (accepted plus rejected) steps.
    pub max_steps: u32,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            first_step: 1.0,
            max_step: 1.0,
            rtol: 1e-3,
            atol: 1e-6,
            max_steps: 1_000_000,
        }
    }
}

impl SolverOptions {
    /// # Errors
    ///
    /// `InvalidParameter` for a non-positive step bound or tolerance.
    pub fn validate(&self) -> Result<(), SirError> {
        for (name, value) in [
            ("first_step", self.first_step),
            ("max_step", self.max_step),
            ("rtol", self.rtol),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SirError::invalid(name, value, "must be positive and finite"));
            }
        }
        if !(self.atol.is_finite() && self.atol >= 0.0) {
            return Err(SirError::invalid(
                "atol",
                self.atol,
                "must be non-negative and finite",
            ));
        }
        Ok(())
    }
}

/// Work counters for one integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Right-hand side evaluations.
    pub evaluations: u32,
    pub accepted: u32,
    pub rejected: u32,
}

impl From<Stats> for SolverStats {
    fn from(stats: Stats) -> Self {
        Self {
            evaluations: stats.num_eval,
            accepted: stats.accepted_steps,
            rejected: stats.rejected_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cap_steps_at_one_day() {
        let options = SolverOptions::default();
        assert_eq!(options.first_step, 1.0);
        assert_eq!(options.max_step, 1.0);
        assert_eq!(options.rtol, 1e-3);
        assert_eq!(options.atol, 1e-6);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = SolverOptions {
            max_step: 0.0,
            ..SolverOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(SirError::InvalidParameter {
                name: "max_step",
                ..
            })
        ));

        let options = SolverOptions {
            atol: -1.0,
            ..SolverOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(SirError::InvalidParameter { name: "atol", .. })
        ));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: SolverOptions = serde_json::from_str(r#"{ "max_steps": 50 }"#).unwrap();
        assert_eq!(options.max_steps, 50);
        assert_eq!(options.first_step, 1.0);
    }
}
