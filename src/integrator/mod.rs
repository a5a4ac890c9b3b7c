//! Two ways to integrate the same SIR model.
//!
//! * [`ForwardEuler`] advances `S`, `I` and `R` one whole day at a time on the grid
//!   `0, 1, ..., ceil(T) - 1`.
//! * [`AdaptiveSolver`] integrates the continuous system over `[0, T]` with an adaptive
//!   Dormand-Prince step capped at one day, returning the (non-uniform) times it stepped to.
//!
//! Both take a [`Scenario`] and return a [`Trajectory`] through the [`Integrator`] trait, and
//! both validate the scenario before doing any arithmetic. [`simulate`] picks the integrator
//! named by the scenario's [`Method`].

mod adaptive;
mod euler;

use std::fmt::{self, Display};

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

pub use adaptive::{sir_model, AdaptiveSolver};
pub use euler::{sim_forward_euler, ForwardEuler};

use crate::error::SirError;
use crate::scenario::Scenario;
use crate::trajectory::Trajectory;

/// Selects an integrator.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Method {
    /// Fixed one-day forward-Euler steps.
    #[serde(rename = "euler")]
    #[value(name = "euler")]
    ForwardEuler,
    /// Adaptive Dormand-Prince 5(4) with steps of at most one day.
    #[default]
    #[serde(rename = "adaptive")]
    #[value(name = "adaptive")]
    AdaptiveSolver,
}

impl Method {
    /// Builds the integrator for this method, using `scenario`'s solver options where relevant.
    #[must_use]
    pub fn integrator(self, scenario: &Scenario) -> Box<dyn Integrator> {
        match self {
            Method::ForwardEuler => Box::new(ForwardEuler),
            Method::AdaptiveSolver => Box::new(AdaptiveSolver::with_options(scenario.solver)),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Method::ForwardEuler => write!(f, "forward Euler"),
            Method::AdaptiveSolver => write!(f, "adaptive Dormand-Prince"),
        }
    }
}

/// Integrates an SIR scenario into a trajectory.
pub trait Integrator {
    fn method(&self) -> Method;

    /// Runs the scenario to its horizon.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` or `DegeneratePopulation` when the scenario fails validation, and
    /// `NonConvergence` when an adaptive integration cannot complete.
    fn integrate(&self, scenario: &Scenario) -> Result<Trajectory, SirError>;
}

/// Runs `scenario` with the integrator its `method` names.
///
/// # Errors
///
/// See [`Integrator::integrate`].
pub fn simulate(scenario: &Scenario) -> Result<Trajectory, SirError> {
    let integrator = scenario.method.integrator(scenario);
    debug!(
        "simulating {} days of beta = {}, gamma = {}, N = {} with {}",
        scenario.horizon,
        scenario.beta,
        scenario.gamma,
        scenario.population(),
        integrator.method()
    );
    integrator.integrate(scenario)
}
