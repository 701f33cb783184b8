use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Orbit, OrbitError, StateVectors, GRAVITATIONAL_CONSTANT};

/// The identifier of a body inside a [`Universe`][crate::Universe].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

/// A resolved absolute state, tagged with the time it was resolved for.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedState {
    /// The time the state was resolved for, in seconds.
    pub time: f64,

    /// The absolute position and velocity at that time.
    pub state: StateVectors,
}

/// How a body's position is determined.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyKind {
    /// The body sits at a constant position, and anchors a tree of orbits.
    Fixed {
        /// The absolute position of the body, in meters.
        position: DVec3,
    },

    /// The body's position is derived from its orbit around a parent.
    Orbiting {
        /// The orbit of the body. One orbit per body.
        orbit: Orbit,

        /// The last resolved absolute state, if the body has been refreshed.
        current: Option<ResolvedState>,
    },
}

/// A struct representing a celestial body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BodyRecord", into = "BodyRecord"))]
pub struct Body {
    /// The name of the celestial body.
    pub name: String,

    /// The mass of the celestial body, in kilograms.
    mass: f64,

    /// The radius of the celestial body, in meters.
    pub radius: f64,

    /// The gravitational parameter `G * mass`, in m^3 s^-2.
    mu: f64,

    /// Whether the body is fixed in place or orbiting a parent.
    pub kind: BodyKind,
}

/// The serialized form of a [`Body`]. The gravitational parameter is
/// derived from the mass again when deserializing.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct BodyRecord {
    name: String,
    mass: f64,
    radius: f64,
    kind: BodyKind,
}

#[cfg(feature = "serde")]
impl TryFrom<BodyRecord> for Body {
    type Error = OrbitError;

    fn try_from(record: BodyRecord) -> Result<Self, Self::Error> {
        Body::new(record.name, record.mass, record.radius, record.kind)
    }
}

#[cfg(feature = "serde")]
impl From<Body> for BodyRecord {
    fn from(body: Body) -> Self {
        BodyRecord {
            name: body.name,
            mass: body.mass,
            radius: body.radius,
            kind: body.kind,
        }
    }
}

impl Body {
    /// Creates a body fixed at `position`.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the celestial body.
    /// * `mass` - The mass of the celestial body, in kilograms.
    /// * `radius` - The radius of the celestial body, in meters.
    /// * `position` - The absolute position of the body, in meters.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::InvalidOrbitalElements`] if the mass is not
    /// positive and finite.
    pub fn fixed(
        name: impl Into<String>,
        mass: f64,
        radius: f64,
        position: DVec3,
    ) -> Result<Self, OrbitError> {
        Self::new(name.into(), mass, radius, BodyKind::Fixed { position })
    }

    /// Creates a body that moves along `orbit`.
    ///
    /// The body's position is unresolved until it is refreshed by a
    /// [`Universe`][crate::Universe].
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::InvalidOrbitalElements`] if the mass is not
    /// positive and finite.
    pub fn orbiting(
        name: impl Into<String>,
        mass: f64,
        radius: f64,
        orbit: Orbit,
    ) -> Result<Self, OrbitError> {
        Self::new(
            name.into(),
            mass,
            radius,
            BodyKind::Orbiting {
                orbit,
                current: None,
            },
        )
    }

    fn new(name: String, mass: f64, radius: f64, kind: BodyKind) -> Result<Self, OrbitError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(OrbitError::invalid(format!(
                "mass of {name} must be positive and finite, got {mass}"
            )));
        }

        Ok(Self {
            name,
            mass,
            radius,
            mu: GRAVITATIONAL_CONSTANT * mass,
            kind,
        })
    }

    /// Gets the mass of the body, in kilograms.
    #[inline]
    pub fn get_mass(&self) -> f64 {
        self.mass
    }

    /// Gets the gravitational parameter `G * mass` of the body, in m^3 s^-2.
    #[doc(alias = "get_mu")]
    #[inline]
    pub fn get_gravitational_parameter(&self) -> f64 {
        self.mu
    }

    /// Gets the orbit of the body, if it is orbiting one.
    pub fn get_orbit(&self) -> Option<&Orbit> {
        match &self.kind {
            BodyKind::Fixed { .. } => None,
            BodyKind::Orbiting { orbit, .. } => Some(orbit),
        }
    }

    /// Gets the ID of the body this one orbits, if any.
    pub fn get_parent(&self) -> Option<BodyId> {
        self.get_orbit().map(Orbit::get_parent)
    }

    /// Gets the last known absolute state of the body.
    ///
    /// Fixed bodies always have a state: their constant position and zero
    /// velocity, valid for any time. Orbiting bodies have one once they have
    /// been refreshed.
    pub fn get_current_state(&self) -> Option<StateVectors> {
        match &self.kind {
            BodyKind::Fixed { position } => Some(StateVectors {
                position: *position,
                velocity: DVec3::ZERO,
            }),
            BodyKind::Orbiting { current, .. } => current.map(|resolved| resolved.state),
        }
    }

    /// Gets the last known absolute position of the body.
    ///
    /// See [`Body::get_current_state`].
    pub fn get_current_position(&self) -> Option<DVec3> {
        self.get_current_state().map(|state| state.position)
    }

    /// Gets the cached absolute state of the body, if it is valid at time `t`.
    pub(crate) fn get_state_resolved_at(&self, t: f64) -> Option<StateVectors> {
        match &self.kind {
            BodyKind::Fixed { .. } => self.get_current_state(),
            BodyKind::Orbiting { current, .. } => current
                .filter(|resolved| resolved.time == t)
                .map(|resolved| resolved.state),
        }
    }

    /// Overwrites the cached state of an orbiting body. Fixed bodies are
    /// left untouched.
    pub(crate) fn set_current_state(&mut self, time: f64, state: StateVectors) {
        if let BodyKind::Orbiting { current, .. } = &mut self.kind {
            *current = Some(ResolvedState { time, state });
        }
    }
}
