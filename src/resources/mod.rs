//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: channels, input state, clocks, asset
//! stores, and the physics scene. Each submodule documents the semantics and
//! intended usage of its resource(s).
//!
//! Overview
//! - `blender` – evaluator registry of the animation engine
//! - `channel` – single-slot broadcast channels and their receivers
//! - `clipstore` – animation clip durations keyed by name
//! - `curvestore` – gravity curves keyed by name
//! - `drawtime` – render clock in integer ticks
//! - `gameconfig` – tunables loaded from an INI file
//! - `input` – per-tick state of the movement actions
//! - `physicsscene` – static colliders and ray queries
//! - `worldtime` – simulation time and delta
pub mod blender;
pub mod channel;
pub mod clipstore;
pub mod curvestore;
pub mod drawtime;
pub mod gameconfig;
pub mod input;
pub mod physicsscene;
pub mod worldtime;
