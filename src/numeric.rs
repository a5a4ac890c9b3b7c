//! Floating point helpers shared by the integrators and their tests. Thin wrappers around the
//! `approx` crate.

use approx::AbsDiffEq;

/// Relative tolerance used when checking that an explicit population matches the sum of the
/// initial compartments.
pub const POPULATION_RTOL: f64 = 1e-9;

/// Compares if two floats are close via `approx::abs_diff_eq` using a maximum absolute difference
/// (epsilon) of `acc`.
#[must_use]
pub fn almost_eq(a: f64, b: f64, acc: f64) -> bool {
    if a.is_infinite() && b.is_infinite() {
        return a == b;
    }
    a.abs_diff_eq(&b, acc)
}

/// Compares two floats via `approx::relative_eq!` with the given maximum relative difference.
#[must_use]
pub fn relative_eq(a: f64, b: f64, max_relative: f64) -> bool {
    approx::relative_eq!(a, b, max_relative = max_relative)
}
