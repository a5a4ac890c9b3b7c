use std::fmt::{self, Display};
use std::io;

use crate::trajectory::Trajectory;

/// Provides `SirError` and maps other errors to
/// convert to a `SirError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SirError {
    /// The total population is zero, so every per-capita rate divides by zero.
    DegeneratePopulation { population: f64 },
    /// A rate, initial compartment, horizon or population failed validation
    /// before integration started.
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// The adaptive solver could not satisfy its step or error constraints.
    /// `partial` holds every accepted sample up to `time`.
    NonConvergence {
        reason: String,
        time: f64,
        partial: Box<Trajectory>,
    },
    IoError(io::Error),
    JsonError(serde_json::Error),
    SirError(String),
}

impl SirError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        SirError::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// The trajectory computed before a solver failure, if this is one.
    #[must_use]
    pub fn partial_trajectory(&self) -> Option<&Trajectory> {
        match self {
            SirError::NonConvergence { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

impl From<io::Error> for SirError {
    fn from(error: io::Error) -> Self {
        SirError::IoError(error)
    }
}

impl From<serde_json::Error> for SirError {
    fn from(error: serde_json::Error) -> Self {
        SirError::JsonError(error)
    }
}

impl From<String> for SirError {
    fn from(error: String) -> Self {
        SirError::SirError(error)
    }
}

impl From<&str> for SirError {
    fn from(error: &str) -> Self {
        SirError::SirError(error.to_string())
    }
}

impl std::error::Error for SirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SirError::IoError(error) => Some(error),
            SirError::JsonError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for SirError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SirError::DegeneratePopulation { population } => write!(
                f,
                "degenerate population: total population is {population}, must be positive"
            ),
            SirError::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "invalid parameter `{name}` = {value}: {reason}"),
            SirError::NonConvergence {
                reason,
                time,
                partial,
            } => write!(
                f,
                "solver failed to converge at t = {time}: {reason} ({} samples computed)",
                partial.len()
            ),
            SirError::IoError(error) => write!(f, "I/O error: {error}"),
            SirError::JsonError(error) => write!(f, "JSON error: {error}"),
            SirError::SirError(message) => write!(f, "Error: {message}"),
        }
    }
}
