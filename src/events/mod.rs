//! Event types and observers used by the controller.
//!
//! Submodules:
//! - [`jump`] – jump notifications triggered when an impulse is applied
//! - [`topics`] – channel topics connecting input, movement and animation
//!
//! See each submodule for concrete event data, semantics, and example usage.
pub mod jump;
pub mod topics;
