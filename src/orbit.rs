use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::anomaly::{
    check_eccentricity, eccentric_from_mean_with_iterations, true_from_eccentric,
    DEFAULT_SOLVER_ITERATIONS,
};
use crate::{Body, BodyId, OrbitError, StateVectors};

use core::f64::consts::TAU;

/// The Keplerian elements describing a bound orbit.
///
/// Angles are in radians, lengths in meters and times in seconds.
/// The elements are time-invariant; only the evaluated position changes
/// with time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalElements {
    /// Half the longest diameter of the orbital ellipse, in meters.
    pub semi_major_axis: f64,

    /// The eccentricity of the orbit. Must lie in `[0, 1)`.
    pub eccentricity: f64,

    /// The tilt of the orbital plane relative to the reference plane, in radians.
    pub inclination: f64,

    /// The longitude of the ascending node, in radians.
    pub long_asc_node: f64,

    /// The longitude of periapsis, in radians.
    ///
    /// This is the sum of the longitude of the ascending node and the
    /// argument of periapsis.
    pub long_periapsis: f64,

    /// The mean longitude at epoch, in radians.
    pub mean_longitude: f64,

    /// The time origin of the orbit, in seconds.
    pub epoch: f64,
}

impl OrbitalElements {
    /// Creates a new set of orbital elements.
    ///
    /// No validation is done here; it happens when an [`Orbit`] is built
    /// from the elements.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        long_asc_node: f64,
        long_periapsis: f64,
        mean_longitude: f64,
        epoch: f64,
    ) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination,
            long_asc_node,
            long_periapsis,
            mean_longitude,
            epoch,
        }
    }

    /// Creates a new set of orbital elements from angles given in degrees.
    ///
    /// This is how almanacs usually tabulate planetary elements.
    pub fn from_degrees(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        long_asc_node: f64,
        long_periapsis: f64,
        mean_longitude: f64,
        epoch: f64,
    ) -> Self {
        Self::new(
            semi_major_axis,
            eccentricity,
            inclination.to_radians(),
            long_asc_node.to_radians(),
            long_periapsis.to_radians(),
            mean_longitude.to_radians(),
            epoch,
        )
    }

    /// Creates the elements of a circular orbit in the reference plane,
    /// with every angle set to zero.
    pub fn circular(radius: f64, epoch: f64) -> Self {
        Self::new(radius, 0.0, 0.0, 0.0, 0.0, 0.0, epoch)
    }

    fn validate(&self) -> Result<(), OrbitError> {
        if !(self.semi_major_axis.is_finite() && self.semi_major_axis > 0.0) {
            return Err(OrbitError::invalid(format!(
                "semi-major axis must be positive and finite, got {}",
                self.semi_major_axis
            )));
        }

        check_eccentricity(self.eccentricity)?;

        let angles = [
            ("inclination", self.inclination),
            ("longitude of ascending node", self.long_asc_node),
            ("longitude of periapsis", self.long_periapsis),
            ("mean longitude", self.mean_longitude),
            ("epoch", self.epoch),
        ];
        for (what, value) in angles {
            if !value.is_finite() {
                return Err(OrbitError::invalid(format!("{what} must be finite, got {value}")));
            }
        }

        Ok(())
    }
}

/// A Keplerian orbit around a parent body, with some cached values.
///
/// The parent is referenced by its [`BodyId`]; the orbit never owns it.
/// The parent's gravitational parameter is copied at construction.
///
/// # Example
/// ```
/// use spacemath::{Body, BodyId, Orbit, OrbitalElements};
/// use glam::DVec3;
///
/// let sun = Body::fixed("Sol", 1.989e30, 6.9634e8, DVec3::ZERO).unwrap();
///
/// let elements = OrbitalElements::circular(1.0e11, 0.0);
/// let orbit = Orbit::around(BodyId(0), &sun, elements).unwrap();
///
/// let position = orbit.get_position_at_time(0.0).unwrap();
/// assert!((position - DVec3::new(1.0e11, 0.0, 0.0)).length() < 1e-3);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "OrbitRecord", into = "OrbitRecord"))]
pub struct Orbit {
    /// The body this orbit revolves around.
    parent: BodyId,

    elements: OrbitalElements,

    /// The gravitational parameter of the parent body, in m^3 s^-2.
    mu: f64,

    /// The number of Newton steps taken when solving Kepler's equation.
    solver_iterations: u32,

    cache: OrbitCachedCalculations,
}

// -------- MEMO --------
// When updating this struct, please review `Orbit::get_cached_calculations()`
#[derive(Clone, Debug, PartialEq)]
struct OrbitCachedCalculations {
    /// The argument of periapsis, in radians.
    arg_pe: f64,

    /// The mean motion, in radians per second.
    mean_motion: f64,

    /// The semi-latus rectum, in meters.
    semi_latus_rectum: f64,
}

/// The serialized form of an [`Orbit`]. The cache is rebuilt, and the
/// elements re-validated, on the way back in.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct OrbitRecord {
    parent: BodyId,
    elements: OrbitalElements,
    mu: f64,
    solver_iterations: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<OrbitRecord> for Orbit {
    type Error = OrbitError;

    fn try_from(record: OrbitRecord) -> Result<Self, Self::Error> {
        Orbit::new(record.parent, record.mu, record.elements)?
            .with_solver_iterations(record.solver_iterations)
    }
}

#[cfg(feature = "serde")]
impl From<Orbit> for OrbitRecord {
    fn from(orbit: Orbit) -> Self {
        OrbitRecord {
            parent: orbit.parent,
            elements: orbit.elements,
            mu: orbit.mu,
            solver_iterations: orbit.solver_iterations,
        }
    }
}

// Initialization and cache management
impl Orbit {
    /// Creates a new orbit around the body with ID `parent`.
    ///
    /// # Parameters
    /// - `parent`: The ID of the parent body.
    /// - `parent_mu`: The gravitational parameter of the parent body, in m^3 s^-2.
    /// - `elements`: The orbital elements.
    ///
    /// # Errors
    /// Returns [`OrbitError::InvalidOrbitalElements`] if the eccentricity is
    /// outside `[0, 1)`, the semi-major axis is not positive, the gravitational
    /// parameter is not positive, or any element is not finite.
    pub fn new(
        parent: BodyId,
        parent_mu: f64,
        elements: OrbitalElements,
    ) -> Result<Orbit, OrbitError> {
        elements.validate()?;

        if !(parent_mu.is_finite() && parent_mu > 0.0) {
            return Err(OrbitError::invalid(format!(
                "gravitational parameter of the parent must be positive and finite, got {parent_mu}"
            )));
        }

        Ok(Orbit {
            parent,
            elements,
            mu: parent_mu,
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
            cache: Self::get_cached_calculations(&elements, parent_mu),
        })
    }

    /// Creates a new orbit around `parent`, which lives at `parent_id`.
    ///
    /// This copies the parent's gravitational parameter; see [`Orbit::new`].
    pub fn around(
        parent_id: BodyId,
        parent: &Body,
        elements: OrbitalElements,
    ) -> Result<Orbit, OrbitError> {
        Self::new(parent_id, parent.get_gravitational_parameter(), elements)
    }

    /// Sets how many Newton steps are taken when solving Kepler's equation.
    ///
    /// # Errors
    /// Returns [`OrbitError::InvalidOrbitalElements`] if `iterations` is zero.
    pub fn with_solver_iterations(mut self, iterations: u32) -> Result<Orbit, OrbitError> {
        if iterations == 0 {
            return Err(OrbitError::invalid("solver iteration count must be at least 1"));
        }
        self.solver_iterations = iterations;
        Ok(self)
    }

    fn get_cached_calculations(elements: &OrbitalElements, mu: f64) -> OrbitCachedCalculations {
        let a = elements.semi_major_axis;
        let e = elements.eccentricity;

        OrbitCachedCalculations {
            arg_pe: elements.long_periapsis - elements.long_asc_node,
            mean_motion: (mu / (a * a * a)).sqrt(),
            semi_latus_rectum: a * (1.0 - e * e),
        }
    }
}

// Element getters
impl Orbit {
    /// Gets the ID of the body this orbit revolves around.
    #[inline]
    pub fn get_parent(&self) -> BodyId {
        self.parent
    }

    /// Gets the orbital elements this orbit was built from.
    #[inline]
    pub fn get_elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// Gets the semi-major axis of the orbit, in meters.
    #[inline]
    pub fn get_semi_major_axis(&self) -> f64 {
        self.elements.semi_major_axis
    }

    /// Gets the eccentricity of the orbit.
    #[inline]
    pub fn get_eccentricity(&self) -> f64 {
        self.elements.eccentricity
    }

    /// Gets the inclination of the orbit, in radians.
    #[inline]
    pub fn get_inclination(&self) -> f64 {
        self.elements.inclination
    }

    /// Gets the longitude of the ascending node, in radians.
    #[inline]
    pub fn get_long_asc_node(&self) -> f64 {
        self.elements.long_asc_node
    }

    /// Gets the longitude of periapsis, in radians.
    #[inline]
    pub fn get_long_periapsis(&self) -> f64 {
        self.elements.long_periapsis
    }

    /// Gets the argument of periapsis, in radians.
    ///
    /// This is the longitude of periapsis minus the longitude of the
    /// ascending node.
    #[inline]
    pub fn get_arg_pe(&self) -> f64 {
        self.cache.arg_pe
    }

    /// Gets the mean longitude at epoch, in radians.
    #[inline]
    pub fn get_mean_longitude_at_epoch(&self) -> f64 {
        self.elements.mean_longitude
    }

    /// Gets the epoch of the orbit, in seconds.
    #[inline]
    pub fn get_epoch(&self) -> f64 {
        self.elements.epoch
    }

    /// Gets the gravitational parameter of the parent body, in m^3 s^-2.
    #[doc(alias = "get_mu")]
    #[inline]
    pub fn get_gravitational_parameter(&self) -> f64 {
        self.mu
    }

    /// Gets the mean motion `sqrt(mu / a^3)`, in radians per second.
    #[inline]
    pub fn get_mean_motion(&self) -> f64 {
        self.cache.mean_motion
    }

    /// Gets the semi-latus rectum `a (1 - e^2)`, in meters.
    #[inline]
    pub fn get_semi_latus_rectum(&self) -> f64 {
        self.cache.semi_latus_rectum
    }

    /// Gets the number of Newton steps taken when solving Kepler's equation.
    #[inline]
    pub fn get_solver_iterations(&self) -> u32 {
        self.solver_iterations
    }

    /// Gets the distance of closest approach to the parent, in meters.
    pub fn get_periapsis(&self) -> f64 {
        self.get_semi_major_axis() * (1.0 - self.get_eccentricity())
    }

    /// Gets the farthest distance from the parent, in meters.
    pub fn get_apoapsis(&self) -> f64 {
        self.get_semi_major_axis() * (1.0 + self.get_eccentricity())
    }

    /// Gets the time it takes to complete one revolution of the orbit, in seconds.
    pub fn get_orbital_period(&self) -> f64 {
        // T = 2pi / n = 2pi * sqrt(a^3 / GM)
        TAU / self.get_mean_motion()
    }
}

// State resolution
impl Orbit {
    /// Gets the mean anomaly at a given time, in radians.
    ///
    /// `M = L - varpi + n (t - epoch)`, where `L` is the mean longitude at
    /// epoch and `varpi` the longitude of periapsis.
    ///
    /// The result is not wrapped into `[0, 2pi)`.
    pub fn get_mean_anomaly_at_time(&self, t: f64) -> f64 {
        self.elements.mean_longitude - self.elements.long_periapsis
            + self.get_mean_motion() * (t - self.elements.epoch)
    }

    /// Gets the eccentric anomaly at a given time, in radians.
    ///
    /// # Errors
    /// Returns [`OrbitError::NonConvergentSolve`] if Newton's method degenerates.
    pub fn get_eccentric_anomaly_at_time(&self, t: f64) -> Result<f64, OrbitError> {
        eccentric_from_mean_with_iterations(
            self.get_mean_anomaly_at_time(t),
            self.get_eccentricity(),
            self.solver_iterations,
        )
    }

    /// Gets the true anomaly at a given time, in radians.
    ///
    /// # Errors
    /// Returns [`OrbitError::NonConvergentSolve`] if Newton's method degenerates.
    pub fn get_true_anomaly_at_time(&self, t: f64) -> Result<f64, OrbitError> {
        let eccentric_anomaly = self.get_eccentric_anomaly_at_time(t)?;
        Ok(true_from_eccentric(eccentric_anomaly, self.get_eccentricity()))
    }

    /// Gets the distance from the parent at a given eccentric anomaly, in meters.
    pub fn get_altitude_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> f64 {
        self.get_semi_major_axis() * (1.0 - self.get_eccentricity() * eccentric_anomaly.cos())
    }

    /// Gets the position relative to the parent at a given eccentric anomaly.
    pub fn get_position_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> DVec3 {
        let true_anomaly = true_from_eccentric(eccentric_anomaly, self.get_eccentricity());
        let radius = self.get_altitude_at_eccentric_anomaly(eccentric_anomaly);

        radius * self.get_radial_unit_vector(true_anomaly)
    }

    /// Gets the position and velocity relative to the parent at a given
    /// eccentric anomaly.
    pub fn get_state_vectors_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> StateVectors {
        let e = self.get_eccentricity();
        let p = self.get_semi_latus_rectum();
        let true_anomaly = true_from_eccentric(eccentric_anomaly, e);
        let radius = self.get_altitude_at_eccentric_anomaly(eccentric_anomaly);

        let position = radius * self.get_radial_unit_vector(true_anomaly);

        // Specific angular momentum
        let h = (self.mu * p).sqrt();

        // d/dt of the position: a radial term from dr/dt = h e sin(v) / p,
        // and a transverse term from r dv/dt = h / r.
        let radial_rate = h * e * true_anomaly.sin() / (radius * p);
        let velocity = position * radial_rate
            - (h / radius) * self.get_transverse_unit_vector(true_anomaly);

        StateVectors { position, velocity }
    }

    /// Gets the position relative to the parent at a given time.
    ///
    /// Add the parent's absolute position to get an absolute position; the
    /// [`Universe`][crate::Universe] does this for whole parent chains.
    ///
    /// # Errors
    /// Returns [`OrbitError::NonConvergentSolve`] if Newton's method degenerates.
    pub fn get_position_at_time(&self, t: f64) -> Result<DVec3, OrbitError> {
        let eccentric_anomaly = self.get_eccentric_anomaly_at_time(t)?;
        Ok(self.get_position_at_eccentric_anomaly(eccentric_anomaly))
    }

    /// Gets the velocity relative to the parent at a given time.
    ///
    /// # Errors
    /// Returns [`OrbitError::NonConvergentSolve`] if Newton's method degenerates.
    pub fn get_velocity_at_time(&self, t: f64) -> Result<DVec3, OrbitError> {
        Ok(self.get_state_vectors_at_time(t)?.velocity)
    }

    /// Gets the position and velocity relative to the parent at a given time.
    ///
    /// # Errors
    /// Returns [`OrbitError::NonConvergentSolve`] if Newton's method degenerates.
    pub fn get_state_vectors_at_time(&self, t: f64) -> Result<StateVectors, OrbitError> {
        let eccentric_anomaly = self.get_eccentric_anomaly_at_time(t)?;
        Ok(self.get_state_vectors_at_eccentric_anomaly(eccentric_anomaly))
    }

    /// The unit vector from the parent towards the body at true anomaly `v`.
    ///
    /// Rotates the in-plane direction by the argument of latitude `w + v`,
    /// then by the inclination and the longitude of the ascending node.
    fn get_radial_unit_vector(&self, true_anomaly: f64) -> DVec3 {
        let (sin_lan, cos_lan) = self.get_long_asc_node().sin_cos();
        let (sin_inc, cos_inc) = self.get_inclination().sin_cos();
        let (sin_u, cos_u) = (self.get_arg_pe() + true_anomaly).sin_cos();

        DVec3::new(
            cos_lan * cos_u - sin_lan * sin_u * cos_inc,
            sin_lan * cos_u + cos_lan * sin_u * cos_inc,
            sin_inc * sin_u,
        )
    }

    /// The negated derivative of the radial unit vector with respect to the
    /// argument of latitude.
    fn get_transverse_unit_vector(&self, true_anomaly: f64) -> DVec3 {
        let (sin_lan, cos_lan) = self.get_long_asc_node().sin_cos();
        let (sin_inc, cos_inc) = self.get_inclination().sin_cos();
        let (sin_u, cos_u) = (self.get_arg_pe() + true_anomaly).sin_cos();

        DVec3::new(
            cos_lan * sin_u + sin_lan * cos_u * cos_inc,
            sin_lan * sin_u - cos_lan * cos_u * cos_inc,
            -sin_inc * cos_u,
        )
    }
}
