//! Movement controller systems.
//!
//! - [`movement_controller_start`] activates newly added controllers by
//!   resolving their gravity curve. Controllers that fail stay inactive.
//! - [`movement_controller`] runs once per simulation tick: it polls the
//!   input topics, advances each [`MovementState`], writes commands into the
//!   [`CharacterBody`], and publishes speed and facing for animation.
//!
//! # System Flow
//!
//! 1. Poll [`MoveDirection`] and [`JumpPressed`] (each at most once per tick)
//! 2. Probe for a wall ahead when wall jumps are enabled and airborne
//! 3. Step the state machine with the fixed tick from [`WorldTime`]
//! 4. Commit walking velocity, gravity, and any jump impulse
//! 5. Broadcast [`HorizontalSpeed`] every tick and [`Facing`] on change
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, error};

use crate::components::characterbody::CharacterBody;
use crate::components::movement::{MovementController, MovementState, TickInput};
use crate::components::position::Position;
use crate::events::jump::JumpEvent;
use crate::events::topics::{DirectionSignal, Facing, HorizontalSpeed, JumpPressed, MoveDirection};
use crate::resources::channel::{Channel, ChannelReceiver};
use crate::resources::curvestore::CurveStore;
use crate::resources::physicsscene::PhysicsScene;
use crate::resources::worldtime::WorldTime;
use crate::systems::probe::probe;

/// Insert a [`MovementState`] on entities whose controller starts cleanly.
pub fn movement_controller_start(
    query: Query<(Entity, &MovementController), (Added<MovementController>, Without<MovementState>)>,
    curves: Res<CurveStore>,
    mut commands: Commands,
) {
    for (entity, controller) in query.iter() {
        match controller.start(&curves) {
            Ok(state) => {
                debug!("Movement controller on {:?} started", entity);
                commands.entity(entity).insert(state);
            }
            Err(e) => {
                error!("Movement controller on {:?} refused to start: {}", entity, e);
            }
        }
    }
}

/// Advance every active movement controller by one simulation tick.
#[allow(clippy::too_many_arguments)]
pub fn movement_controller(
    mut query: Query<(
        Entity,
        &MovementController,
        &mut MovementState,
        &mut CharacterBody,
        Option<&Position>,
    )>,
    time: Res<WorldTime>,
    scene: Option<Res<PhysicsScene>>,
    move_direction: Res<Channel<MoveDirection>>,
    jump_pressed: Res<Channel<JumpPressed>>,
    mut facing: ResMut<Channel<Facing>>,
    mut speed: ResMut<Channel<HorizontalSpeed>>,
    mut direction_rx: Local<ChannelReceiver<MoveDirection>>,
    mut jump_rx: Local<ChannelReceiver<JumpPressed>>,
    mut commands: Commands,
) {
    let direction = direction_rx.try_receive(&move_direction);
    let jump = jump_rx.try_receive(&jump_pressed).unwrap_or(false);

    for (entity, controller, mut state, mut body, position) in query.iter_mut() {
        let grounded = body.is_grounded();

        let wall_ahead = controller.wall_jump
            && !grounded
            && match (scene.as_deref(), position) {
                (Some(scene), Some(position)) => {
                    let heading = direction
                        .and_then(DirectionSignal::from_axis)
                        .unwrap_or(state.facing);
                    probe(
                        scene,
                        position.pos,
                        heading,
                        controller.wall_probe_depth,
                        controller.wall_layers,
                    )
                }
                _ => false,
            };

        let out = state.step(
            controller,
            TickInput {
                direction,
                jump,
                grounded,
                dt: time.delta,
                now: time.elapsed,
                wall_ahead,
            },
        );

        body.set_velocity(Vec3::new(out.speed, 0.0, 0.0));
        body.set_gravity(Vec3::NEG_Y * out.gravity);

        if let Some(kind) = out.jump {
            let impulse = MovementState::jump_impulse(controller);
            body.jump(impulse);
            commands.trigger(JumpEvent {
                entity,
                kind,
                impulse: impulse.length(),
            });
        }

        if let Some(direction) = out.facing_changed {
            facing.broadcast(direction);
        }
        speed.broadcast(out.speed);
    }
}
