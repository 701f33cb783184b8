use core::fmt;
use std::collections::{HashMap, VecDeque};

use glam::DVec3;

use crate::{Body, BodyId, BodyKind, OrbitError, StateVectors};

/// How far an orbit's gravitational parameter may drift from its parent's,
/// relative to the parent's.
const MU_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Struct that represents a set of bodies and the orbits linking them.
///
/// Every orbiting body references its parent by ID, and the parent must
/// already be in the universe when the child is added. The parent relation
/// is therefore always a forest, rooted at fixed bodies.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    /// The celestial bodies in the universe and their relations.
    bodies: HashMap<BodyId, BodyWrapper>,

    /// The next ID to assign to a body.
    next_id: u64,

    /// The current time of the universe, in seconds.
    pub time: f64,

    /// The time step used by [`Universe::tick`], in seconds.
    pub time_step: f64,
}

/// The parent and satellites of a body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyRelation {
    /// The body this one orbits, or `None` for fixed bodies.
    pub parent: Option<BodyId>,

    /// The bodies orbiting this one.
    pub satellites: Vec<BodyId>,
}

#[derive(Clone, Debug, PartialEq)]
struct BodyWrapper {
    body: Body,
    relations: BodyRelation,
}

impl Universe {
    /// Creates an empty universe.
    ///
    /// `time_step` defaults to one hour.
    pub fn new(time_step: Option<f64>) -> Universe {
        Universe {
            bodies: HashMap::new(),
            next_id: 0,
            time: 0.0,
            time_step: time_step.unwrap_or(3.6e3),
        }
    }

    /// Adds a body to the universe.
    ///
    /// An orbiting body is attached as a satellite of its orbit's parent.
    ///
    /// Returns: The ID of the newly-added body.
    ///
    /// # Errors
    /// - [`OrbitError::ParentNotFound`] if the body orbits a parent that is
    ///   not in the universe.
    /// - [`OrbitError::InvalidOrbitalElements`] if the orbit's gravitational
    ///   parameter does not match the parent's. Build orbits with
    ///   [`Orbit::around`][crate::Orbit::around] to copy it.
    pub fn add_body(&mut self, body: Body) -> Result<BodyId, OrbitError> {
        let parent = body.get_parent();

        if let Some(parent_id) = parent {
            let parent_wrapper = self
                .bodies
                .get(&parent_id)
                .ok_or(OrbitError::ParentNotFound(parent_id))?;

            let parent_mu = parent_wrapper.body.get_gravitational_parameter();
            if let Some(orbit) = body.get_orbit() {
                let orbit_mu = orbit.get_gravitational_parameter();
                if ((orbit_mu - parent_mu) / parent_mu).abs() > MU_RELATIVE_TOLERANCE {
                    log::warn!(
                        "Rejecting {}: orbit uses mu = {orbit_mu}, but its parent {} has mu = {parent_mu}",
                        body.name,
                        parent_wrapper.body.name
                    );
                    return Err(OrbitError::invalid(format!(
                        "orbit of {} uses mu = {orbit_mu}, but its parent {} has mu = {parent_mu}",
                        body.name, parent_wrapper.body.name
                    )));
                }
            }
        }

        let id = BodyId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        log::debug!("Adding body {} as {id:?} (parent: {parent:?})", body.name);

        self.bodies.insert(
            id,
            BodyWrapper {
                body,
                relations: BodyRelation {
                    parent,
                    satellites: Vec::new(),
                },
            },
        );
        if let Some(parent_id) = parent {
            if let Some(wrapper) = self.bodies.get_mut(&parent_id) {
                wrapper.relations.satellites.push(id);
            }
        }

        Ok(id)
    }

    /// Removes a body from the universe.
    ///
    /// `id`: The ID of the body to remove.
    ///
    /// Returns: A Vec of all bodies that were removed, including the one specified
    /// and everything orbiting it.
    /// An empty Vec is returned if the body was not found.
    pub fn remove_body(&mut self, id: BodyId) -> Vec<Body> {
        let wrapper = match self.bodies.remove(&id) {
            Some(wrapper) => wrapper,
            None => return Vec::new(),
        };

        let (body, relations) = (wrapper.body, wrapper.relations);
        log::debug!(
            "Removing body {} ({id:?}) and its {} satellite(s)",
            body.name,
            relations.satellites.len()
        );
        let mut bodies = vec![body];

        // Remove the body from its parent's satellites.
        if let Some(parent_id) = relations.parent {
            if let Some(parent_wrapper) = self.bodies.get_mut(&parent_id) {
                parent_wrapper
                    .relations
                    .satellites
                    .retain(|&satellite| satellite != id);
            }
        }

        // Remove children
        for &satellite_id in &relations.satellites {
            bodies.append(&mut self.remove_body(satellite_id));
        }

        bodies
    }

    /// Gets the number of bodies in the universe.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the universe has no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Gets a Vec of all bodies in the universe, in no particular order.
    pub fn get_bodies(&self) -> Vec<&Body> {
        self.bodies.values().map(|wrapper| &wrapper.body).collect()
    }

    /// Gets an immutable reference to a body in the universe.
    pub fn get_body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id).map(|wrapper| &wrapper.body)
    }

    /// Gets the parent and satellites of a body.
    pub fn get_body_relation(&self, id: BodyId) -> Option<&BodyRelation> {
        self.bodies.get(&id).map(|wrapper| &wrapper.relations)
    }

    /// Gets the ID of the body `id` orbits, if any.
    pub fn parent_of(&self, id: BodyId) -> Option<BodyId> {
        self.get_body_relation(id)?.parent
    }

    /// Gets the IDs of the bodies orbiting `id`.
    ///
    /// Returns an empty slice if the body was not found.
    pub fn satellites_of(&self, id: BodyId) -> &[BodyId] {
        self.get_body_relation(id)
            .map(|relations| relations.satellites.as_slice())
            .unwrap_or(&[])
    }

    /// Gets the ID of a body with a given name.
    pub fn body_id_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .find(|(_, w)| w.body.name == name)
            .map(|(id, _)| *id)
    }

    /// Gets the absolute position and velocity of a body at time `t`.
    ///
    /// The whole parent chain is resolved recursively for the same `t`; no
    /// cached state is read or written. The chain ends at a fixed body.
    ///
    /// # Errors
    /// - [`OrbitError::BodyNotFound`] if there is no body with that ID.
    /// - [`OrbitError::NonConvergentSolve`] if an orbit along the chain
    ///   could not be solved.
    pub fn state_at(&self, id: BodyId, t: f64) -> Result<StateVectors, OrbitError> {
        let wrapper = self.bodies.get(&id).ok_or(OrbitError::BodyNotFound(id))?;

        match &wrapper.body.kind {
            BodyKind::Fixed { position } => Ok(StateVectors {
                position: *position,
                velocity: DVec3::ZERO,
            }),
            BodyKind::Orbiting { orbit, .. } => {
                let local = orbit.get_state_vectors_at_time(t)?;
                let parent = self.state_at(orbit.get_parent(), t)?;
                Ok(local.offset_by(&parent))
            }
        }
    }

    /// Gets the absolute position of a body at time `t`.
    ///
    /// See [`Universe::state_at`].
    pub fn position_at(&self, id: BodyId, t: f64) -> Result<DVec3, OrbitError> {
        let wrapper = self.bodies.get(&id).ok_or(OrbitError::BodyNotFound(id))?;

        match &wrapper.body.kind {
            BodyKind::Fixed { position } => Ok(*position),
            BodyKind::Orbiting { orbit, .. } => {
                let local = orbit.get_position_at_time(t)?;
                Ok(local + self.position_at(orbit.get_parent(), t)?)
            }
        }
    }

    /// Refreshes the cached state of a single body for time `t`, reading its
    /// parent's cached state.
    ///
    /// Fixed bodies are left untouched and return their constant position.
    ///
    /// Returns: The new absolute position of the body.
    ///
    /// # Errors
    /// - [`OrbitError::BodyNotFound`] if there is no body with that ID.
    /// - [`OrbitError::MissingParentPosition`] if the parent is an orbiting
    ///   body that has not been refreshed for the same `t`. Refresh parents
    ///   before children, or use [`Universe::update_all`].
    /// - [`OrbitError::NonConvergentSolve`] if the orbit could not be solved.
    pub fn update_position(&mut self, id: BodyId, t: f64) -> Result<DVec3, OrbitError> {
        let wrapper = self.bodies.get(&id).ok_or(OrbitError::BodyNotFound(id))?;

        let orbit = match &wrapper.body.kind {
            BodyKind::Fixed { position } => return Ok(*position),
            BodyKind::Orbiting { orbit, .. } => orbit,
        };

        let parent_id = orbit.get_parent();
        let parent_state = self
            .bodies
            .get(&parent_id)
            .and_then(|parent| parent.body.get_state_resolved_at(t))
            .ok_or(OrbitError::MissingParentPosition {
                body: id,
                parent: parent_id,
                time: t,
            })?;

        let state = orbit.get_state_vectors_at_time(t)?.offset_by(&parent_state);
        log::trace!("Refreshed {id:?} at t = {t}: {}", state.position);

        if let Some(wrapper) = self.bodies.get_mut(&id) {
            wrapper.body.set_current_state(t, state);
        }

        Ok(state.position)
    }

    /// Refreshes the cached state of every body for time `t`.
    ///
    /// Bodies are visited parents-first, starting from the fixed bodies.
    ///
    /// # Errors
    /// Returns [`OrbitError::NonConvergentSolve`] if any orbit could not be
    /// solved. Bodies visited before the failure keep their new state.
    pub fn update_all(&mut self, t: f64) -> Result<(), OrbitError> {
        let mut roots: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|(_, wrapper)| wrapper.relations.parent.is_none())
            .map(|(id, _)| *id)
            .collect();
        roots.sort_unstable();

        let mut queue = VecDeque::from(roots);

        while let Some(id) = queue.pop_front() {
            self.update_position(id, t)?;
            queue.extend(self.satellites_of(id).iter().copied());
        }

        Ok(())
    }

    /// Gets the last refreshed absolute position of a body.
    ///
    /// Fixed bodies always have one. Orbiting bodies have one once they
    /// have been refreshed, and it may be stale.
    pub fn current_position(&self, id: BodyId) -> Option<DVec3> {
        self.get_body(id)?.get_current_position()
    }

    /// Advances the universe by a tick and refreshes every body.
    pub fn tick(&mut self) -> Result<(), OrbitError> {
        self.time += self.time_step;
        self.update_all(self.time)
    }

    /// Advances the universe by multiple ticks and refreshes every body.
    pub fn warp(&mut self, ticks: u128) -> Result<(), OrbitError> {
        self.time += ticks as f64 * self.time_step;
        self.update_all(self.time)
    }
}

impl Default for Universe {
    fn default() -> Self {
        Universe::new(None)
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Universe with {} bodies, t={}",
            self.bodies.len(),
            self.time
        )
    }
}
