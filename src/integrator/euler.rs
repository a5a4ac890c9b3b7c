use log::debug;

use super::{Integrator, Method};
use crate::error::SirError;
use crate::model::{SirParameters, SirState};
use crate::scenario::Scenario;
use crate::trajectory::Trajectory;

/// Discrete-time stepper with a fixed step of one day.
///
/// Every day is computed from the previous day's values only:
///
/// ```text
/// S[t] = S[t-1] - (beta * I[t-1] * S[t-1]) / N
/// I[t] = I[t-1] + (beta * I[t-1] * S[t-1]) / N - gamma * I[t-1]
/// R[t] = R[t-1] + gamma * I[t-1]
/// ```
///
/// `N` is the sum of the initial compartments. The update is first order and is not clamped:
/// large rates can drive compartments negative, and those values are returned as computed so
/// historical runs stay reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEuler;

/// Number of samples on the grid `0, 1, ..., ceil(horizon) - 1`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn day_count(horizon: f64) -> usize {
    horizon.ceil() as usize
}

fn step(state: SirState, beta: f64, gamma: f64, population: f64) -> SirState {
    let SirState {
        susceptible: s,
        infectious: i,
        removed: r,
    } = state;
    // Keep this exact expression order: it defines the published day-by-day values.
    SirState::new(
        s - (beta * i * s) / population,
        i + (beta * i * s) / population - gamma * i,
        r + gamma * i,
    )
}

#[allow(clippy::cast_precision_loss)]
fn run(
    initial: SirState,
    parameters: &SirParameters,
    horizon: f64,
) -> Result<Trajectory, SirError> {
    let SirParameters {
        beta,
        gamma,
        population,
    } = *parameters;
    let days = day_count(horizon);
    let mut trajectory = Trajectory::try_with_capacity(Method::ForwardEuler, population, days)
        .map_err(|_| SirError::invalid("horizon", horizon, "too many days to allocate"))?;
    let mut state = initial;
    trajectory.push(0.0, state);
    for day in 1..days {
        state = step(state, beta, gamma, population);
        trajectory.push(day as f64, state);
    }
    Ok(trajectory)
}

impl Integrator for ForwardEuler {
    fn method(&self) -> Method {
        Method::ForwardEuler
    }

    fn integrate(&self, scenario: &Scenario) -> Result<Trajectory, SirError> {
        let parameters = scenario.parameters()?;
        let initial = scenario.initial_state();
        let parameters = SirParameters {
            population: initial.total(),
            ..parameters
        };
        debug!(
            "forward Euler over {} days, N = {}",
            day_count(scenario.horizon),
            parameters.population
        );
        run(initial, &parameters, scenario.horizon)
    }
}

/// Forward-Euler run from `(s_init, i_init, r_init)` for `horizon` days.
///
/// # Errors
///
/// `DegeneratePopulation` if all initial compartments are zero, `InvalidParameter` for
/// negative or non-finite inputs or a non-positive horizon.
pub fn sim_forward_euler(
    s_init: f64,
    i_init: f64,
    r_init: f64,
    gamma: f64,
    beta: f64,
    horizon: f64,
) -> Result<Trajectory, SirError> {
    let scenario = Scenario::new(SirState::new(s_init, i_init, r_init), beta, gamma, horizon)
        .with_method(Method::ForwardEuler);
    ForwardEuler.integrate(&scenario)
}
