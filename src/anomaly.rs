//! Conversions between the mean, eccentric and true anomalies of a
//! bound (elliptic) orbit.

use core::f64::consts::{PI, TAU};

use crate::solvers::newtons_method;
use crate::OrbitError;

/// The number of Newton steps used by [`eccentric_from_mean`].
///
/// Starting from a guess of pi, this is enough to reach machine precision
/// for the eccentricities of the planets. Orbits with eccentricities close
/// to 1 may need more steps, see [`eccentric_from_mean_with_iterations`].
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 10;

/// Checks that an eccentricity describes a bound orbit, i.e. lies in `[0, 1)`.
pub(crate) fn check_eccentricity(eccentricity: f64) -> Result<(), OrbitError> {
    if (0.0..1.0).contains(&eccentricity) {
        Ok(())
    } else {
        Err(OrbitError::invalid(format!(
            "eccentricity {eccentricity} is outside the supported range [0, 1)"
        )))
    }
}

/// Gets the mean anomaly at a given eccentric anomaly.
///
/// This is Kepler's equation, `M = E - e sin(E)`, and is exact.
#[inline]
pub fn mean_from_eccentric(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin()
}

/// Gets the eccentric anomaly at a given mean anomaly by inverting
/// Kepler's equation with [`DEFAULT_SOLVER_ITERATIONS`] Newton steps.
///
/// See [`eccentric_from_mean_with_iterations`].
///
/// # Example
/// ```
/// use spacemath::anomaly::{eccentric_from_mean, mean_from_eccentric};
///
/// let e = 0.2;
/// let eccentric_anomaly = eccentric_from_mean(1.0, e).unwrap();
/// assert!((mean_from_eccentric(eccentric_anomaly, e) - 1.0).abs() < 1e-12);
/// ```
pub fn eccentric_from_mean(mean_anomaly: f64, eccentricity: f64) -> Result<f64, OrbitError> {
    eccentric_from_mean_with_iterations(mean_anomaly, eccentricity, DEFAULT_SOLVER_ITERATIONS)
}

/// Gets the eccentric anomaly at a given mean anomaly by inverting
/// Kepler's equation with a fixed number of Newton steps.
///
/// The mean anomaly is first wrapped into `[0, 2pi)` and the solve starts
/// at an eccentric anomaly of pi, so the result always lies in `[0, 2pi]`.
///
/// # Errors
/// - [`OrbitError::InvalidOrbitalElements`] if the eccentricity is outside
///   `[0, 1)` or `iterations` is zero.
/// - [`OrbitError::NonConvergentSolve`] if the iteration degenerates.
pub fn eccentric_from_mean_with_iterations(
    mean_anomaly: f64,
    eccentricity: f64,
    iterations: u32,
) -> Result<f64, OrbitError> {
    check_eccentricity(eccentricity)?;

    newtons_method(
        |e_anom: f64| mean_from_eccentric(e_anom, eccentricity),
        |e_anom: f64| 1.0 - eccentricity * e_anom.cos(),
        PI,
        mean_anomaly.rem_euclid(TAU),
        iterations,
    )
}

/// Gets the true anomaly at a given eccentric anomaly.
///
/// Uses the half-angle relation `tan(v/2) = sqrt((1+e)/(1-e)) tan(E/2)`,
/// rewritten so it never passes through `tan(pi/2)`:
///
/// `v = E + 2 atan(beta sin(E) / (1 - beta cos(E)))`,
/// with `beta = e / (1 + sqrt(1 - e^2))`.
///
/// The result stays on the same revolution as the input, so it is
/// continuous and increasing in `E`, including across `E = pi`.
pub fn true_from_eccentric(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let (s, c) = eccentric_anomaly.sin_cos();
    let beta = eccentricity / (1.0 + (1.0 - eccentricity * eccentricity).sqrt());

    eccentric_anomaly + 2.0 * (beta * s / (1.0 - beta * c)).atan()
}

/// Gets the true anomaly at a given mean anomaly.
///
/// This is [`eccentric_from_mean`] followed by [`true_from_eccentric`].
pub fn mean_to_true(mean_anomaly: f64, eccentricity: f64) -> Result<f64, OrbitError> {
    let eccentric_anomaly = eccentric_from_mean(mean_anomaly, eccentricity)?;
    Ok(true_from_eccentric(eccentric_anomaly, eccentricity))
}
