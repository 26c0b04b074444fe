use bevy_ecs::prelude::Component;

use crate::events::topics::DirectionSignal;

/// Rotation about the vertical axis, in degrees.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub yaw_degrees: f32,
}

impl Rotation {
    /// Snap the yaw to face `direction`: +90 for right, -90 for left.
    pub fn face(&mut self, direction: DirectionSignal) {
        self.yaw_degrees = match direction {
            DirectionSignal::Right => 90.0,
            DirectionSignal::Left => -90.0,
        };
    }
}
