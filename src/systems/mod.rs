//! Controller systems.
//!
//! This module groups the ECS systems that map input, advance movement, and
//! drive animation blending, plus the ray helpers they rely on.
//!
//! Submodules overview
//! - [`animation`] – start, update and release blend controllers
//! - [`input`] – publish [`crate::resources::input::InputState`] on the input topics
//! - [`movement`] – start and tick movement controllers
//! - [`physicsscene`] – mirror box colliders into the physics scene
//! - [`picking`] – classify what lies under a screen click
//! - [`probe`] – directional wall probe
//! - [`time`] – update the simulation and render clocks

pub mod animation;
pub mod input;
pub mod movement;
pub mod physicsscene;
pub mod picking;
pub mod probe;
pub mod time;
