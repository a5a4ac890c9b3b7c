//! Numerical simulation of the SIR epidemic model
//!
//! sirsim integrates the Susceptible-Infectious-Removed compartmental model for "what-if"
//! exploration of an epidemic: vary the transmission rate `beta`, the recovery rate `gamma` and
//! the population size, then inspect how many people are infectious at the peak, how many are
//! eventually infected, and how the daily change in infections evolves.
//!
//! Two integrators compute the same model:
//! * [`ForwardEuler`](integrator::ForwardEuler) steps one whole day at a time, reproducing the
//!   classic discrete-time update exactly.
//! * [`AdaptiveSolver`](integrator::AdaptiveSolver) solves the continuous ODE system with an
//!   adaptive Dormand-Prince scheme capped at one-day steps.
//!
//! Both are driven by a [`Scenario`](scenario::Scenario) and produce an immutable
//! [`Trajectory`](trajectory::Trajectory). Invalid inputs (negative rates or compartments, a
//! zero population) are rejected before any arithmetic, and a solver that cannot finish reports
//! [`SirError::NonConvergence`](error::SirError::NonConvergence) together with the samples it
//! did compute.
//!
//! ```rust
//! use sirsim::prelude::*;
//!
//! let scenario = Scenario::new(SirState::new(999.0, 1.0, 0.0), 0.3, 0.1, 160.0);
//! let trajectory = simulate(&scenario).unwrap();
//! let (day, peak) = trajectory.peak_infectious().unwrap();
//! assert!(peak > 250.0 && day > 20.0);
//! ```
//!
//! Plotting is left to the caller: [`FigureData`](plot::FigureData) holds the series and
//! annotations of the standard four-panel figure, and [`PlotRenderer`](plot::PlotRenderer) is
//! the seam a plotting backend implements.
pub mod error;
pub mod integrator;
pub mod log;
pub mod model;
pub mod numeric;
pub mod ode;
pub mod plot;
pub mod runner;
pub mod scenario;
pub mod trajectory;

mod macros;

pub mod prelude;

// Deterministic hashing for the few internal maps.
pub(crate) use rustc_hash::FxHashMap as HashMap;
