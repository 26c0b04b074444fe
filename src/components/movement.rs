//! Platformer movement controller.
//!
//! [`MovementController`] carries the author-time tuning for a character,
//! [`MovementState`] the per-tick state it owns. The state is only inserted
//! once the controller has started successfully (its gravity curve resolved),
//! so an entity without a `MovementState` is inactive.
//!
//! # Horizontal policy
//!
//! - no input: speed decays by [`NO_INPUT_DECAY`] toward zero
//! - input along the current sign (or from rest): accumulate
//!   `axis * move_speed * dt`
//! - input against the current sign: damp by [`REVERSAL_DAMPING`] first, then
//!   accumulate in the new direction
//!
//! The result is always clamped to `±max_velocity_x`.
//!
//! # Jump state machine
//!
//! ```text
//!        fresh press + grounded           held within 300 ms
//! Idle ------------------------> Rising --------------------> Buffered
//!   ^                              |                             |
//!   +---------- landed ------------+-----------------------------+
//! ```
//!
//! A fresh press while still grounded counts as landed, so a jump that never
//! left the ground (blocked overhead) can be retried at once.
//!
//! With the optional features enabled, a fresh press while airborne moves to
//! `Wall` (probe found a wall ahead) or `DoubleJumped` (once per airtime).
//!
//! # Gravity shaping
//!
//! While airborne: `progress = clamp((now - jump_start) / 200 ms, 0, 1)`,
//! `gravity = base * curve(progress) * (1 - hold)`, then `hold *= 0.9`.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use glam::Vec3;
use log::trace;

use crate::error::ConfigurationError;
use crate::events::jump::JumpKind;
use crate::events::topics::DirectionSignal;
use crate::resources::curvestore::{CurveStore, GravityCurve};
use crate::resources::gameconfig::GameConfig;
use crate::resources::physicsscene::CollisionLayers;

/// Speed multiplier applied each tick without horizontal input.
pub const NO_INPUT_DECAY: f32 = 0.8;
/// Speed multiplier applied before accelerating against the current motion.
pub const REVERSAL_DAMPING: f32 = 0.8;
/// Seconds after a jump during which holding the button floats the arc.
pub const JUMP_HOLD_WINDOW: f32 = 0.3;
/// Seconds of airtime mapped onto the full gravity curve.
pub const GRAVITY_CURVE_SPAN: f32 = 0.2;
/// Gravity reduction applied once when the jump is held.
pub const BUFFERED_HOLD_FACTOR: f32 = 0.8;
/// Per-tick decay of the gravity reduction.
pub const HOLD_DECAY: f32 = 0.9;

/// Speeds below this snap to zero while decaying.
const SPEED_EPSILON: f32 = 1e-4;

/// Author-time movement tuning.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct MovementController {
    /// Horizontal speed clamp.
    pub max_velocity_x: f32,
    /// Horizontal acceleration per second of held input.
    pub move_speed: f32,
    /// Jump impulse magnitude.
    pub jump_force: f32,
    /// Gravity magnitude before curve shaping.
    pub base_gravity: f32,
    /// Key of the gravity curve in [`CurveStore`].
    pub gravity_curve: String,
    /// Allow airborne jumps off walls.
    pub wall_jump: bool,
    /// Allow one extra airborne jump.
    pub double_jump: bool,
    /// Reach of the wall probe.
    pub wall_probe_depth: f32,
    /// Layers the wall probe reacts to.
    pub wall_layers: CollisionLayers,
}

impl Default for MovementController {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl MovementController {
    /// Build the controller tuning from the loaded configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            max_velocity_x: config.max_velocity_x.abs(),
            move_speed: config.move_speed,
            jump_force: config.jump_force,
            base_gravity: config.base_gravity,
            gravity_curve: config.gravity_curve.clone(),
            wall_jump: config.wall_jump,
            double_jump: config.double_jump,
            wall_probe_depth: config.wall_probe_depth,
            wall_layers: CollisionLayers::WALL,
        }
    }

    /// Resolve the assets the controller needs and create its initial state.
    ///
    /// Fails when the gravity curve is missing or empty; the controller must
    /// then stay inactive.
    pub fn start(&self, curves: &CurveStore) -> Result<MovementState, ConfigurationError> {
        let curve = curves.resolve(&self.gravity_curve)?;
        Ok(MovementState::new(curve))
    }
}

/// Phase of the jump state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPhase {
    #[default]
    Idle,
    /// Impulse committed, button not (yet) confirmed as held.
    Rising,
    /// Button held early in the jump, gravity reduced.
    Buffered,
    /// Kicked off a wall.
    Wall,
    /// Used the extra airborne jump.
    DoubleJumped,
}

/// Everything the controller consumes in one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Latest horizontal axis value, if one was published this tick.
    pub direction: Option<i32>,
    /// Jump button held this tick.
    pub jump: bool,
    /// Grounded flag reported by physics.
    pub grounded: bool,
    /// Fixed tick length in seconds.
    pub dt: f32,
    /// Simulation time in seconds.
    pub now: f32,
    /// Collision probe result along the facing axis.
    pub wall_ahead: bool,
}

/// Commands produced by one controller tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Clamped horizontal speed, committed as the walking velocity.
    pub speed: f32,
    /// Set when the facing changed this tick.
    pub facing_changed: Option<DirectionSignal>,
    /// Set when an impulse must be committed this tick.
    pub jump: Option<JumpKind>,
    /// Gravity magnitude for this tick.
    pub gravity: f32,
}

/// Per-tick state owned by the movement controller.
#[derive(Component, Clone, Debug)]
pub struct MovementState {
    pub horizontal_speed: f32,
    pub facing: DirectionSignal,
    pub grounded: bool,
    pub jump_phase: JumpPhase,
    /// Simulation time of the last committed jump, seconds.
    pub jump_start: f32,
    /// Gravity reduction in `[0, 1]`.
    pub gravity_hold_factor: f32,
    pub double_jumped: bool,
    /// Jump button state on the previous tick, for edge detection.
    jump_held: bool,
    curve: Arc<GravityCurve>,
}

impl MovementState {
    pub fn new(curve: Arc<GravityCurve>) -> Self {
        Self {
            horizontal_speed: 0.0,
            facing: DirectionSignal::default(),
            grounded: false,
            jump_phase: JumpPhase::Idle,
            jump_start: 0.0,
            gravity_hold_factor: 0.0,
            double_jumped: false,
            jump_held: false,
            curve,
        }
    }

    /// Advance the controller by one simulation tick.
    pub fn step(&mut self, controller: &MovementController, input: TickInput) -> TickOutput {
        let axis = input.direction.unwrap_or(0);
        let facing_changed = self.update_facing(axis);
        self.update_horizontal(controller, axis, input.dt);
        let jump = self.update_jump(controller, &input);
        let gravity = self.update_gravity(controller, input.now);
        TickOutput {
            speed: self.horizontal_speed,
            facing_changed,
            jump,
            gravity,
        }
    }

    fn update_facing(&mut self, axis: i32) -> Option<DirectionSignal> {
        let direction = DirectionSignal::from_axis(axis)?;
        if direction == self.facing {
            return None;
        }
        self.facing = direction;
        Some(direction)
    }

    /// Apply the horizontal acceleration policy.
    pub fn update_horizontal(&mut self, controller: &MovementController, axis: i32, dt: f32) {
        let axis = axis.signum() as f32;
        let mut speed = self.horizontal_speed;

        if axis == 0.0 {
            speed *= NO_INPUT_DECAY;
            if speed.abs() < SPEED_EPSILON {
                speed = 0.0;
            }
        } else {
            if speed != 0.0 && speed.signum() != axis {
                speed *= REVERSAL_DAMPING;
            }
            if dt > 0.0 {
                speed += axis * controller.move_speed * dt;
            } else {
                trace!("Skipping speed accumulation for non-positive tick ({dt})");
            }
        }

        let max = controller.max_velocity_x.abs();
        self.horizontal_speed = speed.clamp(-max, max);
    }

    fn update_jump(&mut self, controller: &MovementController, input: &TickInput) -> Option<JumpKind> {
        let fresh = input.jump && !self.jump_held;
        let held = input.jump && self.jump_held;
        self.jump_held = input.jump;

        let was_grounded = self.grounded;
        self.grounded = input.grounded;

        // Physics may still report contact for a few ticks after the impulse,
        // so landing needs a real airborne -> grounded edge, the hold window
        // to have passed, or a new press made while still on the ground.
        if self.jump_phase != JumpPhase::Idle
            && input.grounded
            && (!was_grounded || fresh || input.now - self.jump_start > JUMP_HOLD_WINDOW)
        {
            self.land();
        }

        match self.jump_phase {
            JumpPhase::Idle if fresh && input.grounded => {
                self.begin_jump(JumpPhase::Rising, input.now);
                return Some(JumpKind::Ground);
            }
            JumpPhase::Rising if held && input.now - self.jump_start <= JUMP_HOLD_WINDOW => {
                self.gravity_hold_factor = BUFFERED_HOLD_FACTOR;
                self.jump_phase = JumpPhase::Buffered;
            }
            _ => {}
        }

        if fresh && !input.grounded {
            if controller.wall_jump && input.wall_ahead {
                self.begin_jump(JumpPhase::Wall, input.now);
                return Some(JumpKind::Wall);
            }
            if controller.double_jump && !self.double_jumped {
                self.double_jumped = true;
                self.begin_jump(JumpPhase::DoubleJumped, input.now);
                return Some(JumpKind::Double);
            }
        }
        None
    }

    fn begin_jump(&mut self, phase: JumpPhase, now: f32) {
        self.jump_phase = phase;
        self.jump_start = now;
        self.gravity_hold_factor = 0.0;
    }

    fn land(&mut self) {
        self.jump_phase = JumpPhase::Idle;
        self.gravity_hold_factor = 0.0;
        self.double_jumped = false;
    }

    /// Normalized position on the gravity curve at time `now`.
    pub fn curve_progress(&self, now: f32) -> f32 {
        if self.jump_phase == JumpPhase::Idle {
            // Walked off a ledge: no jump to shape.
            return 1.0;
        }
        ((now - self.jump_start) / GRAVITY_CURVE_SPAN).clamp(0.0, 1.0)
    }

    fn update_gravity(&mut self, controller: &MovementController, now: f32) -> f32 {
        if self.grounded {
            return controller.base_gravity;
        }
        let progress = self.curve_progress(now);
        let gravity = controller.base_gravity
            * self.curve.sample(progress)
            * (1.0 - self.gravity_hold_factor);
        self.gravity_hold_factor *= HOLD_DECAY;
        gravity
    }

    /// Impulse vector for a committed jump.
    pub fn jump_impulse(controller: &MovementController) -> Vec3 {
        Vec3::Y * controller.jump_force
    }
}
