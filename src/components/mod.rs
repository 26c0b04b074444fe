//! ECS components for entities.
//!
//! This module groups the component types attached to the player character
//! and to the static geometry it moves through.
//!
//! Submodules overview:
//! - [`animation`] – speed-driven locomotion blending and the blend stack
//! - [`boxcollider`] – axis-aligned box collider with collision layers
//! - [`characterbody`] – kinematic character body receiving movement commands
//! - [`movement`] – movement controller, jump state machine and gravity curve
//! - [`position`] – world-space position of an entity
//! - [`rotation`] – yaw angle in degrees

pub mod animation;
pub mod boxcollider;
pub mod characterbody;
pub mod movement;
pub mod position;
pub mod rotation;
