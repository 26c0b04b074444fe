//! Jump notifications.
//!
//! The movement controller triggers a [`JumpEvent`] every time it commits a
//! vertical impulse. Observers can react (dust particles, sounds, stats)
//! without the controller knowing about them.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<JumpEvent>| {
//!     if trigger.event().kind == JumpKind::Wall {
//!         // play wall kick sound
//!     }
//! });
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

/// What allowed the jump to happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Regular jump from the ground.
    Ground,
    /// Airborne jump off a wall detected by the collision probe.
    Wall,
    /// Second airborne jump.
    Double,
}

/// Event emitted when an impulse has been committed to a character body.
#[derive(Event, Debug, Clone, Copy)]
pub struct JumpEvent {
    /// The jumping entity.
    pub entity: Entity,
    /// Jump variant.
    pub kind: JumpKind,
    /// Size of the impulse that was committed.
    pub impulse: f32,
}

/// Debug observer that logs every jump.
pub fn log_jump_observer(trigger: On<JumpEvent>) {
    let event = trigger.event();
    debug!(
        "{:?} jumped ({:?}, impulse {})",
        event.entity, event.kind, event.impulse
    );
}
