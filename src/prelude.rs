pub use crate::error::SirError;
pub use crate::integrator::{
    sim_forward_euler, simulate, sir_model, AdaptiveSolver, ForwardEuler, Integrator, Method,
};
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::model::{sir_derivatives, SirParameters, SirState};
pub use crate::ode::{SolverOptions, SolverStats};
pub use crate::plot::{FigureData, PlotRenderer, PlotStyle};
pub use crate::scenario::Scenario;
pub use crate::trajectory::Trajectory;
pub use crate::{assert_almost_eq, assert_conserved};
