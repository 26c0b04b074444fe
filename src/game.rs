//! World setup and schedules.
//!
//! Hosts build a controller world in three steps:
//!
//! 1. [`init_world`] inserts every resource, registers the channel topics and
//!    the observers
//! 2. [`load_assets`] fills the curve and clip stores from the JSON files
//!    named by [`GameConfig`]
//! 3. [`spawn_demo_level`] adds level geometry when the host has none
//! 4. [`spawn_player`] spawns a fully started character, failing fast when
//!    an asset it needs is missing
//!
//! Then [`fixed_schedule`] runs once per simulation tick and
//! [`frame_schedule`] once per rendered frame.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{error, info};

use crate::components::animation::{BlendController, BlendStack};
use crate::components::boxcollider::BoxCollider;
use crate::components::characterbody::CharacterBody;
use crate::components::movement::MovementController;
use crate::components::position::Position;
use crate::components::rotation::Rotation;
use crate::error::ConfigurationError;
use crate::events::jump::log_jump_observer;
use crate::events::topics::{DirectionSignal, register_core_topics};
use crate::resources::blender::AnimationBlender;
use crate::resources::clipstore::ClipStore;
use crate::resources::curvestore::CurveStore;
use crate::resources::drawtime::DrawTime;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::physicsscene::{CollisionLayers, PhysicsScene};
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{
    blend_controller_start, blend_controller_update, release_blend_evaluators,
    stop_blend_controller,
};
use crate::systems::input::publish_input_actions;
use crate::systems::movement::{movement_controller, movement_controller_start};
use crate::systems::physicsscene::sync_physics_scene;

/// Size of the character's collision box.
pub const PLAYER_SIZE: Vec3 = Vec3::new(0.5, 1.8, 0.5);
/// Top of the demo level's ground slab.
pub const GROUND_Y: f32 = 0.0;
/// Inner faces of the demo level's boundary walls.
pub const WALL_X: f32 = 12.0;

/// Insert resources, register topics and observers.
///
/// Asset stores start empty; see [`load_assets`].
pub fn init_world(world: &mut World, config: GameConfig) {
    world.insert_resource(WorldTime::default());
    world.insert_resource(DrawTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(PhysicsScene::default());
    world.insert_resource(AnimationBlender::default());
    world.insert_resource(CurveStore::default());
    world.insert_resource(ClipStore::default());
    world.insert_resource(config);

    register_core_topics(world);

    world.add_observer(log_jump_observer);
    world.add_observer(release_blend_evaluators);
    world.add_observer(stop_blend_controller);
    // Ensure the observers are registered before any system may trigger.
    world.flush();
}

/// Load gravity curves and clip durations from the configured asset files.
pub fn load_assets(world: &mut World) -> Result<(), ConfigurationError> {
    let (curves_path, clips_path) = {
        let config = world.resource::<GameConfig>();
        (config.curves_path.clone(), config.clips_path.clone())
    };

    world.resource_mut::<CurveStore>().load_file(&curves_path)?;
    world.resource_mut::<ClipStore>().load_file(&clips_path)?;
    Ok(())
}

/// Spawn a started player character at `position`.
///
/// Both controllers are started here rather than by their start systems, so a
/// missing curve or clip is reported to the caller and nothing is spawned.
pub fn spawn_player(world: &mut World, position: Vec3) -> Result<Entity, ConfigurationError> {
    let config = world.resource::<GameConfig>().clone();
    let movement = MovementController::from_config(&config);
    let blend = BlendController::from_config(&config);

    let state = movement.start(world.resource::<CurveStore>()).inspect_err(|e| {
        error!("Cannot spawn player: {}", e);
    })?;
    let evaluators = world
        .resource_scope(|world, mut blender: Mut<AnimationBlender>| {
            blend.start(world.resource::<ClipStore>(), &mut blender)
        })
        .inspect_err(|e| {
            error!("Cannot spawn player: {}", e);
        })?;

    let mut rotation = Rotation::default();
    rotation.face(DirectionSignal::default());

    let entity = world
        .spawn((
            Position { pos: position },
            rotation,
            // Position is the feet of the character.
            BoxCollider::new(PLAYER_SIZE)
                .with_offset(Vec3::new(-PLAYER_SIZE.x * 0.5, 0.0, -PLAYER_SIZE.z * 0.5))
                .with_layers(CollisionLayers::CHARACTER),
            CharacterBody::grounded(),
            movement,
            state,
            blend,
            evaluators,
            BlendStack::default(),
        ))
        .id();
    info!("Spawned player {:?} at {}", entity, position);
    Ok(entity)
}

/// Spawn the demo level: a ground slab topped at [`GROUND_Y`], a wall on each
/// side with its inner face at `±`[`WALL_X`] and one loot crate.
pub fn spawn_demo_level(world: &mut World) {
    world.spawn((
        Position::new(0.0, GROUND_Y - 0.5, 0.0),
        BoxCollider::centered(Vec3::new(40.0, 1.0, 4.0))
            .with_layers(CollisionLayers::GROUND | CollisionLayers::STATIC),
    ));
    for side in [-1.0, 1.0] {
        world.spawn((
            Position::new(side * (WALL_X + 0.5), GROUND_Y + 5.0, 0.0),
            BoxCollider::centered(Vec3::new(1.0, 10.0, 4.0))
                .with_layers(CollisionLayers::WALL | CollisionLayers::STATIC),
        ));
    }
    world.spawn((
        Position::new(4.0, GROUND_Y + 0.4, -1.0),
        BoxCollider::centered(Vec3::splat(0.8)).with_layers(CollisionLayers::LOOT_CRATE),
    ));
}

/// Systems run once per fixed simulation tick.
///
/// Chained so input reaches movement on the same tick and controllers added
/// during the tick are started before it advances.
pub fn fixed_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            publish_input_actions,
            sync_physics_scene,
            movement_controller_start,
            movement_controller,
        )
            .chain(),
    );
    schedule
}

/// Systems run once per rendered frame.
pub fn frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((blend_controller_start, blend_controller_update).chain());
    schedule
}
