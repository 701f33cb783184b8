//! This module contains presets for stars.
//!
//! "A star is a luminous spheroid of plasma held together by self-gravity."  
//!
//! \- [Wikipedia](https://en.wikipedia.org/wiki/Star)

use glam::DVec3;

use crate::{Body, OrbitError};

/// Returns the Sun, fixed at `position`.
pub fn the_sun(position: DVec3) -> Result<Body, OrbitError> {
    Body::fixed("Sol", 1.989e30, 6.9634e8, position)
}
