//! Generic root finding.
//!
//! The solver runs a fixed number of Newton steps with no tolerance check
//! and no early exit. Callers pick an iteration count that is known to be
//! sufficient for their inputs.

use crate::OrbitError;

/// The step size used by [`derivative`] when estimating a derivative
/// numerically.
pub const DEFAULT_DERIVATIVE_STEP: f64 = 1e-9;

/// Builds a forward finite-difference estimate of the derivative of `function`.
///
/// The returned closure evaluates `(f(x + dx) - f(x)) / dx`.
///
/// # Example
/// ```
/// use spacemath::solvers::{derivative, DEFAULT_DERIVATIVE_STEP};
///
/// let square = |x: f64| x * x;
/// let d_square = derivative(square, DEFAULT_DERIVATIVE_STEP);
///
/// assert!((d_square(3.0) - 6.0).abs() < 1e-5);
/// ```
pub fn derivative<F>(function: F, dx: f64) -> impl Fn(f64) -> f64
where
    F: Fn(f64) -> f64,
{
    move |x| (function(x + dx) - function(x)) / dx
}

/// Solves `f(x) = target` using Newton's method.
///
/// Each step applies `x = x + (target - f(x)) / f_prime(x)`, starting
/// from `x0`, for exactly `iterations` steps.
///
/// # Errors
/// Returns [`OrbitError::NonConvergentSolve`] if the derivative is zero
/// or non-finite at some iterate, or if an iterate stops being finite.
/// Returns [`OrbitError::InvalidOrbitalElements`] if `iterations` is zero.
///
/// # Example
/// ```
/// use spacemath::solvers::newtons_method;
///
/// // Solve x^2 = 2
/// let root = newtons_method(|x| x * x, |x| 2.0 * x, 1.0, 2.0, 8).unwrap();
/// assert!((root - 2f64.sqrt()).abs() < 1e-12);
/// ```
pub fn newtons_method<F, D>(
    f: F,
    f_prime: D,
    x0: f64,
    target: f64,
    iterations: u32,
) -> Result<f64, OrbitError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    if iterations == 0 {
        return Err(OrbitError::invalid("Newton's method needs at least one iteration"));
    }

    let mut x = x0;

    for iteration in 0..iterations {
        let slope = f_prime(x);

        if slope == 0.0 || !slope.is_finite() {
            log::warn!("Newton iteration {iteration} hit a degenerate derivative at x = {x}");
            return Err(OrbitError::NonConvergentSolve { iteration, x });
        }

        let next = x + (target - f(x)) / slope;

        if !next.is_finite() {
            log::warn!("Newton iteration {iteration} left the finite range from x = {x}");
            return Err(OrbitError::NonConvergentSolve { iteration, x });
        }

        x = next;
    }

    Ok(x)
}

/// Solves `f(x) = target` using Newton's method, estimating the derivative
/// with a forward finite difference of step [`DEFAULT_DERIVATIVE_STEP`].
///
/// See [`newtons_method`] for the iteration scheme and error conditions.
pub fn newtons_method_numeric<F>(
    f: F,
    x0: f64,
    target: f64,
    iterations: u32,
) -> Result<f64, OrbitError>
where
    F: Fn(f64) -> f64 + Copy,
{
    newtons_method(
        f,
        derivative(f, DEFAULT_DERIVATIVE_STEP),
        x0,
        target,
        iterations,
    )
}
