//! This module contains presets for the planets of the Solar System.
//!
//! Orbital elements are the J2000 mean elements, relative to the ecliptic,
//! with [`DEFAULT_EPOCH`] as their epoch.
//!
//! Every function takes the ID and gravitational parameter of the body
//! to orbit, usually the Sun.

use crate::{Body, BodyId, Orbit, OrbitError, OrbitalElements, ASTRONOMICAL_UNIT, DEFAULT_EPOCH};

/// Mass (kg), radius (m), then semi-major axis (AU), eccentricity, and
/// inclination, longitude of ascending node, longitude of periapsis and
/// mean longitude (degrees).
type PlanetData = (f64, f64, f64, f64, f64, f64, f64, f64);

fn planet(
    name: &str,
    data: PlanetData,
    parent: BodyId,
    parent_mu: f64,
) -> Result<Body, OrbitError> {
    let (mass, radius, a, e, incl, lan, lon_pe, mean_long) = data;

    let elements = OrbitalElements::from_degrees(
        a * ASTRONOMICAL_UNIT,
        e,
        incl,
        lan,
        lon_pe,
        mean_long,
        DEFAULT_EPOCH,
    );
    let orbit = Orbit::new(parent, parent_mu, elements)?;

    Body::orbiting(name, mass, radius, orbit)
}

/// Returns Mercury, orbiting `parent`.
pub fn mercury(parent: BodyId, parent_mu: f64) -> Result<Body, OrbitError> {
    planet(
        "Mercury",
        (
            0.33010e24, 2.4397e6, 0.38709893, 0.20563, 7.00487, 48.33167, 77.45645, 252.25084,
        ),
        parent,
        parent_mu,
    )
}

/// Returns Venus, orbiting `parent`.
pub fn venus(parent: BodyId, parent_mu: f64) -> Result<Body, OrbitError> {
    planet(
        "Venus",
        (
            4.8673e24, 6.0518e6, 0.723, 0.00677323, 3.39471, 76.68069, 131.53298, 181.97973,
        ),
        parent,
        parent_mu,
    )
}

/// Returns the Earth, orbiting `parent`.
pub fn earth(parent: BodyId, parent_mu: f64) -> Result<Body, OrbitError> {
    planet(
        "Earth",
        (
            5.972e24, 6.371e6, 1.0, 0.01671, 0.00005, -11.26064, 102.94719, 100.46435,
        ),
        parent,
        parent_mu,
    )
}

/// Returns Mars, orbiting `parent`.
pub fn mars(parent: BodyId, parent_mu: f64) -> Result<Body, OrbitError> {
    planet(
        "Mars",
        (
            0.64169e24, 3.3895e6, 1.52366231, 0.09341233, 1.85061, 49.57854, 336.04084, 355.45332,
        ),
        parent,
        parent_mu,
    )
}

/// Returns Jupiter, orbiting `parent`.
pub fn jupiter(parent: BodyId, parent_mu: f64) -> Result<Body, OrbitError> {
    planet(
        "Jupiter",
        (
            1898.13e24, 69.911e6, 5.20336301, 0.04839266, 1.30530, 100.55615, 14.75385, 34.40438,
        ),
        parent,
        parent_mu,
    )
}

/// Returns Saturn, orbiting `parent`.
pub fn saturn(parent: BodyId, parent_mu: f64) -> Result<Body, OrbitError> {
    planet(
        "Saturn",
        (
            568.32e24, 58.232e6, 9.5370732, 0.05415060, 2.48446, 113.71504, 92.43194, 49.94432,
        ),
        parent,
        parent_mu,
    )
}

/// Returns Uranus, orbiting `parent`.
pub fn uranus(parent: BodyId, parent_mu: f64) -> Result<Body, OrbitError> {
    planet(
        "Uranus",
        (
            86.811e24, 25.362e6, 19.19126393, 0.04716771, 0.76986, 74.22988, 170.96424, 313.23218,
        ),
        parent,
        parent_mu,
    )
}

/// Returns Neptune, orbiting `parent`.
pub fn neptune(parent: BodyId, parent_mu: f64) -> Result<Body, OrbitError> {
    planet(
        "Neptune",
        (
            102.409e24, 24.622e6, 30.06896348, 0.00858586, 1.76917, 131.72169, 44.97135, 304.88003,
        ),
        parent,
        parent_mu,
    )
}
