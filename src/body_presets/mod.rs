//! This module contains presets for celestial bodies, and a builder for a
//! ready-made Solar System.
//!
//! The presets are plain constructors; nothing here is global state. Build
//! a [`Universe`] from them (or call [`solar_system`]) and pass it to
//! whatever needs to look bodies up.

use glam::DVec3;

use crate::{Body, BodyId, OrbitError, Universe};

pub mod planets;
pub mod stars;

/// The planet constructors, in order of distance from the Sun.
const PLANETS: [fn(BodyId, f64) -> Result<Body, OrbitError>; 8] = [
    planets::mercury,
    planets::venus,
    planets::earth,
    planets::mars,
    planets::jupiter,
    planets::saturn,
    planets::uranus,
    planets::neptune,
];

/// Builds a universe with the Sun fixed at the origin and the eight
/// planets orbiting it.
///
/// Bodies can be looked up by name with [`Universe::body_id_by_name`].
///
/// # Example
/// ```
/// use spacemath::body_presets::solar_system;
/// use spacemath::{ASTRONOMICAL_UNIT, DEFAULT_EPOCH};
///
/// let universe = solar_system().unwrap();
/// let earth = universe.body_id_by_name("Earth").unwrap();
///
/// let distance = universe.position_at(earth, DEFAULT_EPOCH).unwrap().length();
/// assert!((distance / ASTRONOMICAL_UNIT - 1.0).abs() < 0.02);
/// ```
pub fn solar_system() -> Result<Universe, OrbitError> {
    let mut universe = Universe::default();

    let sun = stars::the_sun(DVec3::ZERO)?;
    let sun_mu = sun.get_gravitational_parameter();
    let sun_id = universe.add_body(sun)?;

    for make_planet in PLANETS {
        universe.add_body(make_planet(sun_id, sun_mu)?)?;
    }

    log::debug!("Built solar system with {} bodies", universe.len());

    Ok(universe)
}
