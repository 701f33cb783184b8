#![cfg(test)]

use core::f64::consts::{PI, TAU};

use approx::assert_relative_eq;

use crate::anomaly::{
    eccentric_from_mean, eccentric_from_mean_with_iterations, mean_from_eccentric, mean_to_true,
    true_from_eccentric, DEFAULT_SOLVER_ITERATIONS,
};
use crate::solvers::{derivative, newtons_method, newtons_method_numeric, DEFAULT_DERIVATIVE_STEP};
use crate::OrbitError;

const ANOMALY_POLL_ANGLES: usize = 1024;
const RANDOM_CASES: usize = 2048;
const ECCENTRICITIES: [f64; 8] = [0.0, 0.001, 0.0167, 0.1, 0.3, 0.5, 0.7, 0.9];


use assertions::*;
use seeders::*;

fn poll_angles() -> impl Iterator<Item = f64> {
    (0..ANOMALY_POLL_ANGLES).map(|i| i as f64 * TAU / ANOMALY_POLL_ANGLES as f64)
}

#[test]
fn newton_solves_square_root() {
    let root = newtons_method(|x| x * x, |x| 2.0 * x, 1.0, 2.0, 8).unwrap();
    assert_relative_eq!(root, 2f64.sqrt(), max_relative = 1e-12);

    let root = newtons_method(|x| x * x * x, |x| 3.0 * x * x, 1.0, 27.0, 30).unwrap();
    assert_relative_eq!(root, 3.0, max_relative = 1e-12);
}

#[test]
fn newton_runs_exactly_the_requested_iterations() {
    // x1 = 1 + (2 - 1) / 2
    let one_step = newtons_method(|x| x * x, |x| 2.0 * x, 1.0, 2.0, 1).unwrap();
    assert_eq!(one_step, 1.5);

    // x2 = 1.5 + (2 - 2.25) / 3
    let two_steps = newtons_method(|x| x * x, |x| 2.0 * x, 1.0, 2.0, 2).unwrap();
    assert_relative_eq!(two_steps, 1.5 - 0.25 / 3.0);
}

#[test]
fn newton_reports_zero_derivative() {
    let result = newtons_method(|x| x * x, |x| 2.0 * x, 0.0, 1.0, 5);
    assert_eq!(
        result,
        Err(OrbitError::NonConvergentSolve {
            iteration: 0,
            x: 0.0
        })
    );

    let result = newtons_method(f64::cos, |x| -x.sin(), 0.0, 0.5, 3);
    assert!(matches!(
        result,
        Err(OrbitError::NonConvergentSolve { iteration: 0, .. })
    ));
}

#[test]
fn newton_reports_non_finite_iterates() {
    let result = newtons_method(|_| f64::NAN, |_| 1.0, 0.0, 1.0, 3);
    assert!(matches!(result, Err(OrbitError::NonConvergentSolve { .. })));

    let result = newtons_method(|x| x, |_| f64::INFINITY, 0.0, 1.0, 3);
    assert!(matches!(result, Err(OrbitError::NonConvergentSolve { .. })));
}

#[test]
fn newton_rejects_zero_iterations() {
    let result = newtons_method(|x| x, |_| 1.0, 0.0, 1.0, 0);
    assert!(matches!(
        result,
        Err(OrbitError::InvalidOrbitalElements { .. })
    ));
}

#[test]
fn numeric_derivative_is_close() {
    let d_sin = derivative(f64::sin, DEFAULT_DERIVATIVE_STEP);
    assert_almost_eq(d_sin(0.0), 1.0, "d/dx sin(x) at 0");
    assert_almost_eq(d_sin(PI), -1.0, "d/dx sin(x) at pi");

    let d_cube = derivative(|x: f64| x * x * x, DEFAULT_DERIVATIVE_STEP);
    assert_almost_eq_within(d_cube(2.0), 12.0, 1e-5, "d/dx x^3 at 2");
}

#[test]
fn newton_with_numeric_derivative() {
    let root = newtons_method_numeric(|x| x * x * x, 2.0, 27.0, 20).unwrap();
    assert_almost_eq(root, 3.0, "cube root of 27");

    let e = 0.3;
    let mean_anomaly = 1.2;
    let numeric = newtons_method_numeric(|x: f64| x - e * x.sin(), PI, mean_anomaly, 10).unwrap();
    let analytic = eccentric_from_mean(mean_anomaly, e).unwrap();
    assert_almost_eq(numeric, analytic, "numeric vs analytic Kepler solve");
}

#[test]
fn mean_from_eccentric_is_keplers_equation() {
    assert_eq!(mean_from_eccentric(0.0, 0.5), 0.0);
    assert_relative_eq!(mean_from_eccentric(PI / 2.0, 0.5), PI / 2.0 - 0.5);
    assert_relative_eq!(mean_from_eccentric(PI, 0.9), PI);
}

#[test]
fn eccentric_anomaly_round_trip() {
    for e in ECCENTRICITIES {
        for eccentric_anomaly in poll_angles() {
            let mean_anomaly = mean_from_eccentric(eccentric_anomaly, e);
            let solved = eccentric_from_mean(mean_anomaly, e).unwrap();

            assert_almost_eq_within(
                solved,
                eccentric_anomaly,
                1e-9,
                &format!("round trip of E = {eccentric_anomaly} at e = {e}"),
            );
        }
    }
}

#[test]
fn eccentric_anomaly_round_trip_high_eccentricity() {
    for e in [0.95, 0.99] {
        for eccentric_anomaly in poll_angles() {
            let mean_anomaly = mean_from_eccentric(eccentric_anomaly, e);
            let solved = eccentric_from_mean_with_iterations(mean_anomaly, e, 50).unwrap();

            assert_almost_eq(
                solved,
                eccentric_anomaly,
                &format!("round trip of E = {eccentric_anomaly} at e = {e}"),
            );
        }
    }
}

#[test]
fn eccentric_anomaly_round_trip_random() {
    for _ in 0..RANDOM_CASES {
        let e = random_eccentricity();
        let eccentric_anomaly = rand::random_range(0.0..TAU);
        let mean_anomaly = mean_from_eccentric(eccentric_anomaly, e);
        let solved = eccentric_from_mean_with_iterations(mean_anomaly, e, 40).unwrap();

        assert_almost_eq(
            solved,
            eccentric_anomaly,
            &format!("random round trip of E = {eccentric_anomaly} at e = {e}"),
        );
    }
}

#[test]
fn mean_anomaly_is_wrapped_before_solving() {
    for e in ECCENTRICITIES {
        // M = 0 is skipped: whole turns may wrap it to just below 2pi
        for mean_anomaly in poll_angles().skip(1) {
            let solved = eccentric_from_mean(mean_anomaly, e).unwrap();
            assert!(
                (0.0..=TAU).contains(&solved),
                "E = {solved} out of range for M = {mean_anomaly}, e = {e}"
            );

            for turns in [-3.0, -1.0, 1.0, 2.0] {
                let shifted = eccentric_from_mean(mean_anomaly + turns * TAU, e).unwrap();
                assert_almost_eq(
                    shifted,
                    solved,
                    &format!("M = {mean_anomaly} shifted by {turns} turns at e = {e}"),
                );
            }
        }
    }
}

#[test]
fn circular_orbit_anomalies_coincide() {
    for mean_anomaly in poll_angles() {
        let eccentric_anomaly = eccentric_from_mean(mean_anomaly, 0.0).unwrap();
        let true_anomaly = true_from_eccentric(eccentric_anomaly, 0.0);

        assert_almost_eq_within(eccentric_anomaly, mean_anomaly, 1e-12, "E vs M at e = 0");
        assert_eq!(true_anomaly, eccentric_anomaly, "v vs E at e = 0");
    }
}

#[test]
fn true_anomaly_is_continuous_at_pi() {
    const EPSILON: f64 = 1e-9;

    for e in ECCENTRICITIES {
        let below = true_from_eccentric(PI - EPSILON, e);
        let at = true_from_eccentric(PI, e);
        let above = true_from_eccentric(PI + EPSILON, e);

        assert_almost_eq(at, PI, &format!("v at E = pi for e = {e}"));
        assert!(below < at && at < above, "v not increasing across pi for e = {e}");
        assert_almost_eq(below, above, &format!("v across E = pi for e = {e}"));
    }
}

#[test]
fn true_anomaly_is_increasing() {
    for e in ECCENTRICITIES {
        let mut previous = -1.0;
        for eccentric_anomaly in poll_angles() {
            let true_anomaly = true_from_eccentric(eccentric_anomaly, e);
            assert!(
                true_anomaly > previous,
                "v = {true_anomaly} not increasing at E = {eccentric_anomaly}, e = {e}"
            );
            assert!((0.0..TAU).contains(&true_anomaly));
            previous = true_anomaly;
        }
    }
}

#[test]
fn true_anomaly_matches_arccos_branch_form() {
    for e in ECCENTRICITIES {
        for eccentric_anomaly in poll_angles() {
            // acos loses precision where its argument nears +/- 1
            let away_from_apsides = (eccentric_anomaly - PI).abs() > 0.05
                && eccentric_anomaly > 0.05
                && eccentric_anomaly < TAU - 0.05;
            if !away_from_apsides {
                continue;
            }

            let cos_ecc = eccentric_anomaly.cos();
            let principal = ((cos_ecc - e) / (1.0 - e * cos_ecc)).acos();
            let branch = if eccentric_anomaly > PI {
                TAU - principal
            } else {
                principal
            };

            assert_almost_eq_within(
                true_from_eccentric(eccentric_anomaly, e),
                branch,
                1e-9,
                &format!("atan vs acos form at E = {eccentric_anomaly}, e = {e}"),
            );
        }
    }
}

#[test]
fn mean_to_true_composes() {
    let e = 0.4;
    let mean_anomaly = 2.5;
    let expected = true_from_eccentric(eccentric_from_mean(mean_anomaly, e).unwrap(), e);
    assert_eq!(mean_to_true(mean_anomaly, e).unwrap(), expected);
}

#[test]
fn unbound_eccentricities_are_rejected() {
    for e in [1.0, 1.5, -0.1, f64::NAN, f64::INFINITY] {
        let result = eccentric_from_mean(1.0, e);
        assert!(
            matches!(result, Err(OrbitError::InvalidOrbitalElements { .. })),
            "e = {e} was not rejected: {result:?}"
        );
    }
}

#[test]
fn default_iterations_match_explicit() {
    let e = 0.2;
    for mean_anomaly in poll_angles() {
        assert_eq!(
            eccentric_from_mean(mean_anomaly, e),
            eccentric_from_mean_with_iterations(mean_anomaly, e, DEFAULT_SOLVER_ITERATIONS)
        );
    }
}
