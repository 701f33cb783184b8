use thiserror::Error;

use crate::BodyId;

/// Errors that can occur while building bodies and orbits or resolving
/// their positions.
///
/// None of these are transient: retrying the same call with the same
/// inputs produces the same error.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    /// The orbital elements, body properties or solver settings are outside
    /// of what this crate supports.
    ///
    /// This includes eccentricities outside `[0, 1)`, non-positive
    /// semi-major axes, non-positive masses, and an orbit whose
    /// gravitational parameter disagrees with its parent's.
    ///
    /// It is also the error for a zero iteration count, including one passed
    /// straight to [`newtons_method`][crate::solvers::newtons_method], where
    /// no orbital elements are involved.
    #[error("Invalid orbital elements: {reason}")]
    InvalidOrbitalElements {
        /// A human-readable description of the offending value.
        reason: String,
    },

    /// Newton's method hit a zero or non-finite derivative, or produced
    /// a non-finite iterate.
    #[error("Non-convergent input: Newton iteration {iteration} degenerated at x = {x}")]
    NonConvergentSolve {
        /// The zero-based iteration at which the solve broke down.
        iteration: u32,
        /// The last finite iterate before the breakdown.
        x: f64,
    },

    /// A body was refreshed from its parent's cached position, but the
    /// parent had not been refreshed for the same time yet.
    #[error("Parent {parent:?} of body {body:?} has no resolved position for t = {time}")]
    MissingParentPosition {
        /// The body being refreshed.
        body: BodyId,
        /// The parent whose cached position was missing or stale.
        parent: BodyId,
        /// The requested time, in seconds.
        time: f64,
    },

    /// There was no body at the specified parent ID.
    #[error("There was no body at the specified parent ID {0:?}")]
    ParentNotFound(BodyId),

    /// There was no body at the specified ID.
    #[error("There was no body at the specified ID {0:?}")]
    BodyNotFound(BodyId),
}

impl OrbitError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        OrbitError::InvalidOrbitalElements {
            reason: reason.into(),
        }
    }
}
