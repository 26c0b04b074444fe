//! Per-tick input resource.
//!
//! Captures the subset of device state the character controller cares about.
//! Device polling lives outside the crate: the host calls
//! [`InputState::set_action`] once per simulation tick for each action, and
//! the input mapper system turns the result into channel broadcasts.
use bevy_ecs::prelude::*;

/// Logical input actions understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move left (default: A / Left arrow).
    MoveLeft,
    /// Move right (default: D / Right arrow).
    MoveRight,
    /// Jump (default: Space).
    Jump,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean action state with edge flags.
pub struct BoolState {
    /// Whether the action is currently held.
    pub active: bool,
    /// Whether the action was pressed this tick.
    pub just_pressed: bool,
    /// Whether the action was released this tick.
    pub just_released: bool,
}

impl BoolState {
    /// Update the held state and derive the edge flags from the previous one.
    pub fn update(&mut self, active: bool) {
        self.just_pressed = active && !self.active;
        self.just_released = !active && self.active;
        self.active = active;
    }
}

/// Resource holding the actions relevant to the character controller.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputState {
    pub move_left: BoolState,
    pub move_right: BoolState,
    pub jump: BoolState,
}

impl InputState {
    /// Record whether `action` is held this tick.
    pub fn set_action(&mut self, action: InputAction, active: bool) {
        self.state_mut(action).update(active);
    }

    /// Current state for `action`.
    pub fn state(&self, action: InputAction) -> BoolState {
        match action {
            InputAction::MoveLeft => self.move_left,
            InputAction::MoveRight => self.move_right,
            InputAction::Jump => self.jump,
        }
    }

    fn state_mut(&mut self, action: InputAction) -> &mut BoolState {
        match action {
            InputAction::MoveLeft => &mut self.move_left,
            InputAction::MoveRight => &mut self.move_right,
            InputAction::Jump => &mut self.jump,
        }
    }

    /// Horizontal axis: right wins over left, nothing held is 0.
    pub fn horizontal_axis(&self) -> i32 {
        if self.move_right.active {
            1
        } else if self.move_left.active {
            -1
        } else {
            0
        }
    }
}
