//! Animation blend systems.
//!
//! - [`blend_controller_start`] acquires clip evaluators for newly added
//!   [`BlendController`]s. Controllers whose clips do not resolve stay inactive.
//! - [`blend_controller_update`] runs once per render frame: it consumes the
//!   latest [`HorizontalSpeed`] and [`Facing`] broadcasts, advances playback
//!   and rebuilds each entity's [`BlendStack`].
//! - [`release_blend_evaluators`] is an observer that hands evaluators back
//!   to the [`AnimationBlender`] when [`BlendEvaluators`] is removed.
//! - [`stop_blend_controller`] is an observer that strips [`BlendEvaluators`]
//!   from an entity losing its [`BlendController`], so the release above runs.
//!
//! # Related
//!
//! - [`crate::components::animation`] – lerp selection and playback math
//! - [`crate::resources::clipstore::ClipStore`] – clip durations
//! - [`crate::resources::drawtime::DrawTime`] – render clock

use bevy_ecs::lifecycle::Remove;
use bevy_ecs::prelude::*;
use log::{debug, error};

use crate::components::animation::{
    BlendController, BlendEvaluators, BlendStack, BlendTreeBuilder,
};
use crate::components::rotation::Rotation;
use crate::events::topics::{Facing, HorizontalSpeed};
use crate::resources::blender::AnimationBlender;
use crate::resources::channel::{Channel, ChannelReceiver};
use crate::resources::clipstore::ClipStore;
use crate::resources::drawtime::DrawTime;

/// Acquire evaluators for blend controllers added since the last run.
pub fn blend_controller_start(
    query: Query<(Entity, &BlendController), (Added<BlendController>, Without<BlendEvaluators>)>,
    clips: Res<ClipStore>,
    mut blender: ResMut<AnimationBlender>,
    mut commands: Commands,
) {
    for (entity, controller) in query.iter() {
        match controller.start(&clips, &mut blender) {
            Ok(evaluators) => {
                debug!("Blend controller on {:?} started", entity);
                commands
                    .entity(entity)
                    .insert((evaluators, BlendStack::default()));
            }
            Err(e) => {
                error!("Blend controller on {:?} refused to start: {}", entity, e);
            }
        }
    }
}

/// Advance blend playback by the render frame's elapsed time.
///
/// Speed is kept from the last broadcast when nothing new arrived, so a
/// character coasting at constant speed keeps its blend.
pub fn blend_controller_update(
    mut query: Query<(
        &mut BlendController,
        &BlendEvaluators,
        &mut BlendStack,
        Option<&mut Rotation>,
    )>,
    time: Res<DrawTime>,
    speed: Res<Channel<HorizontalSpeed>>,
    facing: Res<Channel<Facing>>,
    mut speed_rx: Local<ChannelReceiver<HorizontalSpeed>>,
    mut facing_rx: Local<ChannelReceiver<Facing>>,
) {
    let new_speed = speed_rx.try_receive(&speed);
    let new_facing = facing_rx.try_receive(&facing);

    for (mut controller, evaluators, mut stack, rotation) in query.iter_mut() {
        if let Some(speed) = new_speed {
            controller.speed = speed;
        }
        if let (Some(direction), Some(mut rotation)) = (new_facing, rotation) {
            rotation.face(direction);
        }
        controller.update(evaluators, time.elapsed);
        controller.build_blend_tree(evaluators, &mut stack);
    }
}

/// Release evaluators held by an entity losing its [`BlendEvaluators`].
///
/// Fires on explicit removal and on despawn.
pub fn release_blend_evaluators(
    trigger: On<Remove, BlendEvaluators>,
    query: Query<&BlendEvaluators>,
    mut blender: ResMut<AnimationBlender>,
) {
    let entity = trigger.event().entity;
    if let Ok(evaluators) = query.get(entity) {
        evaluators.release(&mut blender);
        debug!("Released blend evaluators of {:?}", entity);
    }
}

/// Drop the evaluators of an entity whose [`BlendController`] is removed.
///
/// On despawn the queued removal finds no entity and does nothing; the
/// evaluators are then released by the despawn itself.
pub fn stop_blend_controller(
    trigger: On<Remove, BlendController>,
    query: Query<(), With<BlendEvaluators>>,
    mut commands: Commands,
) {
    let entity = trigger.event().entity;
    if query.contains(entity) {
        commands.entity(entity).try_remove::<BlendEvaluators>();
        debug!("Blend controller on {:?} stopped", entity);
    }
}
