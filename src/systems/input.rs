//! Input mapper system.
//!
//! - [`publish_input_actions`] turns the host-filled
//!   [`InputState`](crate::resources::input::InputState) into channel
//!   broadcasts once per simulation tick: the horizontal axis on
//!   [`MoveDirection`] and, while the jump button is held, `true` on
//!   [`JumpPressed`].
use bevy_ecs::prelude::*;

use crate::events::topics::{JumpPressed, MoveDirection};
use crate::resources::channel::Channel;
use crate::resources::input::InputState;

/// Publish the current input state on the movement topics.
pub fn publish_input_actions(
    input: Res<InputState>,
    mut move_direction: ResMut<Channel<MoveDirection>>,
    mut jump_pressed: ResMut<Channel<JumpPressed>>,
) {
    move_direction.broadcast(input.horizontal_axis());
    if input.jump.active {
        jump_pressed.broadcast(true);
    }
}
