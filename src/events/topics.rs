//! Channel topics exchanged between input, movement, and animation.
//!
//! Each topic is a marker type implementing [`Topic`]; the matching
//! [`Channel`](crate::resources::channel::Channel) resource is registered by
//! [`register_core_topics`].
//!
//! | Topic | Payload | Publisher | Readers |
//! |-------|---------|-----------|---------|
//! | [`MoveDirection`] | `i32` in {-1, 0, 1} | input mapper | movement |
//! | [`JumpPressed`] | `bool` | input mapper | movement |
//! | [`Facing`] | [`DirectionSignal`] | movement | animation |
//! | [`HorizontalSpeed`] | `f32` | movement | animation |
//! | [`IsAttacking`] | `bool` | reserved | - |

use bevy_ecs::prelude::World;
use serde::{Deserialize, Serialize};

use crate::resources::channel::{Topic, register_topic};

/// Horizontal facing of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DirectionSignal {
    Left,
    #[default]
    Right,
}

impl DirectionSignal {
    /// Map a raw input axis value to a facing. Zero has no facing.
    pub fn from_axis(axis: i32) -> Option<Self> {
        match axis.signum() {
            1 => Some(DirectionSignal::Right),
            -1 => Some(DirectionSignal::Left),
            _ => None,
        }
    }

    /// Unit sign along the horizontal axis.
    pub fn sign(self) -> f32 {
        match self {
            DirectionSignal::Left => -1.0,
            DirectionSignal::Right => 1.0,
        }
    }
}

/// Horizontal input axis.
pub struct MoveDirection;
impl Topic for MoveDirection {
    type Value = i32;
    const NAME: &'static str = "move_direction";
}

/// Jump button held this tick.
pub struct JumpPressed;
impl Topic for JumpPressed {
    type Value = bool;
    const NAME: &'static str = "jump_pressed";
}

/// Facing changes published by the movement controller.
pub struct Facing;
impl Topic for Facing {
    type Value = DirectionSignal;
    const NAME: &'static str = "facing";
}

/// Signed horizontal speed published every simulation tick.
pub struct HorizontalSpeed;
impl Topic for HorizontalSpeed {
    type Value = f32;
    const NAME: &'static str = "horizontal_speed";
}

/// Reserved for an attack animation layer. Nothing publishes it yet.
pub struct IsAttacking;
impl Topic for IsAttacking {
    type Value = bool;
    const NAME: &'static str = "is_attacking";
}

/// Register every topic used by the character controller.
pub fn register_core_topics(world: &mut World) {
    register_topic::<MoveDirection>(world);
    register_topic::<JumpPressed>(world);
    register_topic::<Facing>(world);
    register_topic::<HorizontalSpeed>(world);
    register_topic::<IsAttacking>(world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::channel::Channel;

    #[test]
    fn test_direction_from_axis() {
        assert_eq!(DirectionSignal::from_axis(1), Some(DirectionSignal::Right));
        assert_eq!(DirectionSignal::from_axis(-1), Some(DirectionSignal::Left));
        assert_eq!(DirectionSignal::from_axis(0), None);
        assert_eq!(DirectionSignal::from_axis(5), Some(DirectionSignal::Right));
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(DirectionSignal::Left.sign(), -1.0);
        assert_eq!(DirectionSignal::Right.sign(), 1.0);
    }

    #[test]
    fn test_register_core_topics() {
        let mut world = World::new();
        register_core_topics(&mut world);
        assert!(world.contains_resource::<Channel<MoveDirection>>());
        assert!(world.contains_resource::<Channel<JumpPressed>>());
        assert!(world.contains_resource::<Channel<Facing>>());
        assert!(world.contains_resource::<Channel<HorizontalSpeed>>());
        assert!(world.contains_resource::<Channel<IsAttacking>>());
    }
}
