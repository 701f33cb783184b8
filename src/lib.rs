//! # Spacemath
//! This library crate computes where celestial bodies are at a given time,
//! from their Keplerian orbital elements.
//!
//! Each position is found by solving Kepler's equation with Newton's method,
//! turning the resulting anomaly into a Cartesian offset from the parent body,
//! and adding that offset to the parent's own position. Parents may orbit
//! other bodies in turn; every chain ends at a body with a fixed position.
//!
//! This is a two-body model evaluated at an instant: there are no
//! perturbations, no multi-body dynamics and no numerical integration.
//! Only bound orbits (eccentricity in `[0, 1)`) are supported.
//!
//! ## Getting started
//! This crate provides four main structs:
//! - [`Orbit`]: A Keplerian orbit around a parent body, referenced by ID.
//!   It caches the mean motion, semi-latus rectum and argument of periapsis.
//! - [`Body`]: A celestial body, either fixed in place or orbiting a parent.
//! - [`Universe`]: A set of bodies and their parent-child relations. It
//!   resolves absolute positions through the parent chain, and can refresh
//!   each body's cached position in parent-first order.
//! - [`StateVectors`]: A position and velocity pair.
//!
//! The [`anomaly`] and [`solvers`] modules expose the underlying Kepler
//! equation solver, and [`body_presets`] contains the Sun and the planets
//! of the Solar System.
//!
//! ## Units
//! Angles are in radians, times in seconds, lengths in meters and masses in
//! kilograms. Gravitational parameters use the SI [`GRAVITATIONAL_CONSTANT`].
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//!
//! use spacemath::{Body, Orbit, OrbitalElements, Universe};
//!
//! # fn main() -> Result<(), spacemath::OrbitError> {
//! let mut universe = Universe::default();
//!
//! let star = Body::fixed("Star", 2.0e30, 7.0e8, DVec3::new(1.0, 2.0, 3.0))?;
//! let star_mu = star.get_gravitational_parameter();
//! let star_id = universe.add_body(star)?;
//!
//! let orbit = Orbit::new(star_id, star_mu, OrbitalElements::circular(1.0e11, 0.0))?;
//! let planet = Body::orbiting("Planet", 6.0e24, 6.4e6, orbit)?;
//! let planet_id = universe.add_body(planet)?;
//!
//! let position = universe.position_at(planet_id, 0.0)?;
//! assert!((position - DVec3::new(1.0e11 + 1.0, 2.0, 3.0)).length() < 1e-3);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod anomaly;
mod body;
pub mod body_presets;
mod error;
mod orbit;
pub mod solvers;
mod universe;

use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use body::{Body, BodyId, BodyKind, ResolvedState};
pub use error::OrbitError;
pub use orbit::{Orbit, OrbitalElements};
pub use universe::{BodyRelation, Universe};

/// Newton's gravitational constant, in m^3 kg^-1 s^-2.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

/// The astronomical unit, in meters.
pub const ASTRONOMICAL_UNIT: f64 = 1.495978707e11;

/// The length of a Julian year, in seconds.
pub const SECONDS_IN_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// The epoch of the bundled planetary elements: 30 Julian years after the
/// time origin, i.e. J2000 when time is counted from 1970.
pub const DEFAULT_EPOCH: f64 = 30.0 * SECONDS_IN_YEAR;

/// A struct representing a position and velocity at a point in the orbit.
///
/// The position and velocity vectors are three-dimensional.
///
/// The position vector is in meters, while the velocity vector is in
/// meters per second.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors {
    /// The 3D position at a point in the orbit, in meters.
    pub position: DVec3,
    /// The 3D velocity at a point in the orbit, in meters per second.
    pub velocity: DVec3,
}

impl StateVectors {
    /// Moves these parent-relative state vectors into the frame the parent's
    /// own state is expressed in.
    ///
    /// # Example
    /// ```
    /// use glam::DVec3;
    /// use spacemath::StateVectors;
    ///
    /// let local = StateVectors {
    ///     position: DVec3::new(1.0, 0.0, 0.0),
    ///     velocity: DVec3::new(0.0, 1.0, 0.0),
    /// };
    /// let parent = StateVectors {
    ///     position: DVec3::new(10.0, 0.0, 0.0),
    ///     velocity: DVec3::new(0.0, 0.0, 2.0),
    /// };
    ///
    /// let absolute = local.offset_by(&parent);
    /// assert_eq!(absolute.position, DVec3::new(11.0, 0.0, 0.0));
    /// assert_eq!(absolute.velocity, DVec3::new(0.0, 1.0, 2.0));
    /// ```
    #[must_use]
    pub fn offset_by(&self, parent: &StateVectors) -> StateVectors {
        StateVectors {
            position: self.position + parent.position,
            velocity: self.velocity + parent.velocity,
        }
    }
}

#[cfg(test)]
mod tests;
