//! PaddyTown character controller library.
//!
//! This module exposes the controller's ECS components, resources, systems, and
//! events for use by the demo binary, integration tests, and host engines.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
