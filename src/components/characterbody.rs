//! Command sink for the external physics character.
//!
//! The [`CharacterBody`] component is the boundary between the movement
//! controller and the physics engine. The controller writes commands into it
//! each tick (walking velocity, jump impulses, gravity); the engine reads
//! them, simulates, and writes back the grounded flag.
//!
//! Impulses queue until the engine drains them, so a test or host can count
//! exactly how many were issued.

use bevy_ecs::prelude::Component;
use glam::Vec3;
use smallvec::SmallVec;

/// Physics-facing state of a controlled character.
///
/// # Example
/// ```ignore
/// let mut body = CharacterBody::new();
/// body.set_grounded(true);
/// body.jump(Vec3::Y * 10.0);
/// for impulse in body.drain_impulses() {
///     engine.apply_impulse(impulse);
/// }
/// ```
#[derive(Component, Clone, Debug, Default)]
pub struct CharacterBody {
    /// Commanded walking velocity, world units per second.
    velocity: Vec3,
    /// Commanded gravity acceleration.
    gravity: Vec3,
    /// Impulses issued since the engine last drained them.
    impulses: SmallVec<[Vec3; 2]>,
    /// Written by the physics engine.
    grounded: bool,
}

impl CharacterBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body already standing on the ground.
    pub fn grounded() -> Self {
        Self {
            grounded: true,
            ..Self::default()
        }
    }

    /// Set the walking velocity.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Get the commanded walking velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Queue a jump impulse.
    pub fn jump(&mut self, impulse: Vec3) {
        self.impulses.push(impulse);
    }

    /// Impulses waiting for the engine.
    pub fn pending_impulses(&self) -> &[Vec3] {
        &self.impulses
    }

    /// Hand all pending impulses to the caller.
    pub fn drain_impulses(&mut self) -> SmallVec<[Vec3; 2]> {
        std::mem::take(&mut self.impulses)
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }
}
