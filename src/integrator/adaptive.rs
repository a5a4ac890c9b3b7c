use log::{debug, warn};
use ode_solvers::dop_shared::{IntegrationError, OutputType, System};
use ode_solvers::dopri5::Dopri5;
use ode_solvers::Vector3;

use super::{Integrator, Method};
use crate::error::SirError;
use crate::model::{sir_derivatives, SirParameters, SirState};
use crate::ode::{SolverOptions, SolverStats};
use crate::scenario::Scenario;
use crate::trajectory::Trajectory;

type State = Vector3<f64>;

const SAFETY_FACTOR: f64 = 0.9;
// Step-size controller stabilization; zero gives the plain err^(-1/5) update.
const STABILIZATION: f64 = 0.0;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const STIFFNESS_CHECK_INTERVAL: u32 = 1000;

/// The SIR right-hand side as seen by the solver.
struct SirSystem(SirParameters);

impl System<f64, State> for SirSystem {
    fn system(&self, _t: f64, y: &State, dy: &mut State) {
        let SirParameters {
            beta,
            gamma,
            population,
        } = self.0;
        let [ds, di, dr] = sir_derivatives([y[0], y[1], y[2]], beta, gamma, population);
        dy[0] = ds;
        dy[1] = di;
        dy[2] = dr;
    }
}

fn describe(error: &IntegrationError) -> (f64, &'static str) {
    match *error {
        IntegrationError::MaxNumStepReached { x, .. } => (x, "maximum number of steps exceeded"),
        IntegrationError::StepSizeUnderflow { x } => {
            (x, "required step size is less than the spacing between numbers")
        }
        IntegrationError::StiffnessDetected { x } => (x, "problem appears to be stiff"),
    }
}

/// Continuous-time integration of the SIR system with an adaptive Dormand-Prince 5(4) solver.
///
/// The default options start with a one-day step and never exceed it, so the epidemic peak is
/// resolved even when the solver would otherwise take long strides through the slow early
/// phase. Output times are the solver's accepted steps and are not uniform in general.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveSolver {
    options: SolverOptions,
}

impl AdaptiveSolver {
    #[must_use]
    pub fn with_options(options: SolverOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }
}

impl Integrator for AdaptiveSolver {
    fn method(&self) -> Method {
        Method::AdaptiveSolver
    }

    fn integrate(&self, scenario: &Scenario) -> Result<Trajectory, SirError> {
        let parameters = scenario.parameters()?;
        self.options.validate()?;
        let initial = scenario.initial_state();
        let options = &self.options;

        let mut stepper = Dopri5::from_param(
            SirSystem(parameters),
            0.0,
            scenario.horizon,
            0.0,
            State::new(initial.susceptible, initial.infectious, initial.removed),
            options.rtol,
            options.atol,
            SAFETY_FACTOR,
            STABILIZATION,
            MIN_FACTOR,
            MAX_FACTOR,
            options.max_step,
            options.first_step,
            options.max_steps,
            STIFFNESS_CHECK_INTERVAL,
            OutputType::Sparse,
        );
        let result = stepper.integrate();

        let mut time = stepper.x_out().clone();
        let mut states: Vec<[f64; 3]> =
            stepper.y_out().iter().map(|y| [y[0], y[1], y[2]]).collect();
        if time.first() != Some(&0.0) {
            time.insert(0, 0.0);
            states.insert(0, initial.to_array());
        }

        match result {
            Ok(stats) => {
                let stats = SolverStats::from(stats);
                debug!(
                    "adaptive solver: {} accepted, {} rejected steps, {} evaluations",
                    stats.accepted, stats.rejected, stats.evaluations
                );
                Ok(Trajectory::from_samples(
                    Method::AdaptiveSolver,
                    parameters.population,
                    time,
                    states,
                    Some(stats),
                ))
            }
            Err(error) => {
                let (time_reached, reason) = describe(&error);
                warn!(
                    "adaptive solver stopped at t = {time_reached} of {}: {reason}",
                    scenario.horizon
                );
                let partial = Trajectory::from_samples(
                    Method::AdaptiveSolver,
                    parameters.population,
                    time,
                    states,
                    None,
                );
                Err(SirError::NonConvergence {
                    reason: reason.to_string(),
                    time: time_reached,
                    partial: Box::new(partial),
                })
            }
        }
    }
}

/// Adaptive run over `[0, horizon]` for population `n` starting from `(s0, i0, r0)`.
///
/// # Errors
///
/// `InvalidParameter` when `n` differs from `s0 + i0 + r0` or any input is out of range,
/// `DegeneratePopulation` when `n` is zero, and `NonConvergence` when the solver fails.
pub fn sir_model(
    n: f64,
    s0: f64,
    i0: f64,
    r0: f64,
    gamma: f64,
    beta: f64,
    horizon: f64,
) -> Result<Trajectory, SirError> {
    let scenario = Scenario::new(SirState::new(s0, i0, r0), beta, gamma, horizon)
        .with_population(n)
        .with_method(Method::AdaptiveSolver);
    AdaptiveSolver::default().integrate(&scenario)
}
