//! Controller tick integration tests for input mapping, movement, jumping,
//! wall probing, and animation blending driven through the real schedules.

use std::time::Duration;

use bevy_ecs::prelude::*;
use glam::Vec3;

use paddytown::components::animation::{BlendController, BlendEvaluators, BlendOp, BlendStack, ClipSlot};
use paddytown::components::characterbody::CharacterBody;
use paddytown::components::movement::{JumpPhase, MovementController, MovementState};
use paddytown::components::rotation::Rotation;
use paddytown::error::ConfigurationError;
use paddytown::events::jump::{JumpEvent, JumpKind};
use paddytown::events::topics::{DirectionSignal, Facing, HorizontalSpeed, MoveDirection};
use paddytown::game;
use paddytown::resources::blender::AnimationBlender;
use paddytown::resources::channel::Channel;
use paddytown::resources::clipstore::{AnimationClip, ClipStore};
use paddytown::resources::curvestore::{CurveKey, CurveStore, GravityCurve};
use paddytown::resources::drawtime::TICKS_PER_SECOND;
use paddytown::resources::gameconfig::GameConfig;
use paddytown::resources::input::{InputAction, InputState};
use paddytown::resources::physicsscene::{CollisionLayers, PhysicsScene, RaycastQuery};
use paddytown::resources::worldtime::WorldTime;
use paddytown::systems::movement::movement_controller;
use paddytown::systems::physicsscene::sync_physics_scene;
use paddytown::systems::probe::probe;
use paddytown::systems::time::{update_draw_time, update_world_time};

const DT: f32 = 0.016;
const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Resource, Default)]
struct JumpLog(Vec<JumpEvent>);

fn record_jump(trigger: On<JumpEvent>, mut log: ResMut<JumpLog>) {
    log.0.push(*trigger.event());
}

/// Curve rising linearly from 0.5 to 1.0.
fn test_curve() -> GravityCurve {
    GravityCurve::new(vec![
        CurveKey { t: 0.0, value: 0.5 },
        CurveKey { t: 1.0, value: 1.0 },
    ])
}

fn make_world(config: GameConfig) -> World {
    let mut world = World::new();
    game::init_world(&mut world, config);
    world.resource_mut::<CurveStore>().insert("jump", test_curve());
    {
        let mut clips = world.resource_mut::<ClipStore>();
        clips.insert("idle", AnimationClip { duration: 2 * TICKS_PER_SECOND });
        clips.insert("walk", AnimationClip { duration: TICKS_PER_SECOND });
        clips.insert("run", AnimationClip { duration: TICKS_PER_SECOND / 2 });
        clips.insert("jump", AnimationClip { duration: TICKS_PER_SECOND });
    }
    world.init_resource::<JumpLog>();
    world.add_observer(record_jump);
    world.flush();
    world
}

fn spawn(world: &mut World) -> Entity {
    game::spawn_player(world, Vec3::ZERO).expect("player should spawn")
}

fn set_buttons(world: &mut World, left: bool, right: bool, jump: bool) {
    let mut input = world.resource_mut::<InputState>();
    input.set_action(InputAction::MoveLeft, left);
    input.set_action(InputAction::MoveRight, right);
    input.set_action(InputAction::Jump, jump);
}

fn tick(world: &mut World, schedule: &mut Schedule) {
    update_world_time(world, DT);
    schedule.run(world);
}

fn frame(world: &mut World, schedule: &mut Schedule, ticks: i64) {
    update_draw_time(world, Duration::from_nanos((ticks * 100) as u64));
    schedule.run(world);
}

fn state(world: &World, entity: Entity) -> &MovementState {
    world.get::<MovementState>(entity).expect("movement state")
}

fn body(world: &World, entity: Entity) -> &CharacterBody {
    world.get::<CharacterBody>(entity).expect("character body")
}

fn set_grounded(world: &mut World, entity: Entity, grounded: bool) {
    world
        .get_mut::<CharacterBody>(entity)
        .expect("character body")
        .set_grounded(grounded);
}

// --- horizontal movement ---

#[test]
fn test_holding_right_accelerates_then_clamps() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, true, false);
    let mut previous = 0.0;
    for _ in 0..1000 {
        tick(&mut world, &mut fixed);
        let speed = state(&world, player).horizontal_speed;
        assert!(speed >= previous - EPSILON);
        assert!(speed <= 10.0 + EPSILON);
        previous = speed;
    }
    assert!(approx_eq(previous, 10.0));
    assert!(approx_eq(body(&world, player).velocity().x, 10.0));
}

#[test]
fn test_speed_bounded_for_random_input() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();
    let mut rng = fastrand::Rng::with_seed(1234);

    for _ in 0..3000 {
        set_buttons(&mut world, rng.bool(), rng.bool(), rng.u8(..) < 20);
        set_grounded(&mut world, player, rng.u8(..) < 200);
        tick(&mut world, &mut fixed);

        let speed = state(&world, player).horizontal_speed;
        assert!(speed.abs() <= 10.0 + EPSILON, "speed {speed} out of bounds");
        let published = world.resource::<Channel<HorizontalSpeed>>().peek().copied();
        assert_eq!(published, Some(speed));
    }
}

#[test]
fn test_released_input_decays_without_sign_change() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, true, false);
    for _ in 0..200 {
        tick(&mut world, &mut fixed);
    }
    set_buttons(&mut world, false, false, false);
    let mut previous = state(&world, player).horizontal_speed;
    assert!(previous > 0.0);
    for _ in 0..100 {
        tick(&mut world, &mut fixed);
        let speed = state(&world, player).horizontal_speed;
        assert!(speed.abs() <= previous.abs());
        assert!(speed >= 0.0);
        previous = speed;
    }
}

#[test]
fn test_direction_is_consumed_once_per_broadcast() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut movement_only = Schedule::default();
    movement_only.add_systems(movement_controller);

    world.resource_mut::<Channel<MoveDirection>>().broadcast(1);
    tick(&mut world, &mut movement_only);
    let first = state(&world, player).horizontal_speed;
    assert!(approx_eq(first, DT));

    // Nothing new published: treated as no input.
    tick(&mut world, &mut movement_only);
    let second = state(&world, player).horizontal_speed;
    assert!(approx_eq(second, first * 0.8));
}

// --- jumping ---

#[test]
fn test_single_press_yields_one_impulse() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, false, true);
    tick(&mut world, &mut fixed);
    set_buttons(&mut world, false, false, false);
    for _ in 0..5 {
        tick(&mut world, &mut fixed);
    }

    let impulses = body(&world, player).pending_impulses();
    assert_eq!(impulses.len(), 1);
    assert!(approx_eq(impulses[0].length(), 10.0));
    assert_eq!(state(&world, player).jump_phase, JumpPhase::Rising);
    assert!(approx_eq(state(&world, player).jump_start, DT));

    let log = &world.resource::<JumpLog>().0;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].entity, player);
    assert_eq!(log[0].kind, JumpKind::Ground);
}

#[test]
fn test_hold_buffers_jump_once() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, false, true);
    tick(&mut world, &mut fixed);
    set_grounded(&mut world, player, false);

    tick(&mut world, &mut fixed);
    let s = state(&world, player);
    assert_eq!(s.jump_phase, JumpPhase::Buffered);
    // 0.8 applied this tick, then decayed once.
    assert!(approx_eq(s.gravity_hold_factor, 0.8 * 0.9));
    // progress 0.08 on the test curve: 0.54, reduced by the hold.
    assert!(approx_eq(body(&world, player).gravity().y, -10.0 * 0.54 * 0.2));

    let mut previous = s.gravity_hold_factor;
    for _ in 0..10 {
        tick(&mut world, &mut fixed);
        let hold = state(&world, player).gravity_hold_factor;
        assert!(hold < previous);
        previous = hold;
    }
    assert_eq!(body(&world, player).pending_impulses().len(), 1);
}

#[test]
fn test_gravity_reaches_full_curve_after_span() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, false, true);
    tick(&mut world, &mut fixed);
    set_buttons(&mut world, false, false, false);
    set_grounded(&mut world, player, false);

    // 250 ms of airtime.
    for _ in 0..16 {
        tick(&mut world, &mut fixed);
    }
    let now = world.resource::<WorldTime>().elapsed;
    let s = state(&world, player);
    assert!(now - s.jump_start >= 0.25 - EPSILON);
    assert_eq!(s.curve_progress(now), 1.0);
    assert!(approx_eq(body(&world, player).gravity().y, -10.0));
}

#[test]
fn test_landing_returns_to_idle() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, false, true);
    tick(&mut world, &mut fixed);
    set_buttons(&mut world, false, false, false);
    set_grounded(&mut world, player, false);
    for _ in 0..20 {
        tick(&mut world, &mut fixed);
    }
    set_grounded(&mut world, player, true);
    tick(&mut world, &mut fixed);
    assert_eq!(state(&world, player).jump_phase, JumpPhase::Idle);
}

#[test]
fn test_wall_jump_needs_wall_ahead() {
    let config = GameConfig {
        wall_jump: true,
        ..GameConfig::default()
    };
    let mut world = make_world(config);
    world.resource_mut::<PhysicsScene>().add_box(
        Vec3::new(0.4, -1.0, -1.0),
        Vec3::new(1.4, 5.0, 1.0),
        CollisionLayers::WALL,
    );
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, false, true);
    tick(&mut world, &mut fixed);
    set_buttons(&mut world, false, false, false);
    set_grounded(&mut world, player, false);
    tick(&mut world, &mut fixed);

    // Facing left, away from the wall: refused.
    set_buttons(&mut world, true, false, true);
    tick(&mut world, &mut fixed);
    assert_eq!(body(&world, player).pending_impulses().len(), 1);

    set_buttons(&mut world, false, false, false);
    tick(&mut world, &mut fixed);
    set_buttons(&mut world, false, true, true);
    tick(&mut world, &mut fixed);
    assert_eq!(body(&world, player).pending_impulses().len(), 2);
    assert_eq!(state(&world, player).jump_phase, JumpPhase::Wall);

    let kinds: Vec<JumpKind> = world.resource::<JumpLog>().0.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![JumpKind::Ground, JumpKind::Wall]);
}

#[test]
fn test_demo_level_ground_and_walls() {
    let mut world = make_world(GameConfig::default());
    game::spawn_demo_level(&mut world);
    world.run_system_cached(sync_physics_scene).expect("scene sync");
    let scene = world.resource::<PhysicsScene>();

    for x in [-15.0, -3.0, 0.0, 3.0, 15.0] {
        let hits = scene.raycast_penetrating(
            Vec3::new(x, 5.0, 0.0),
            Vec3::new(x, -5.0, 0.0),
            CollisionLayers::GROUND,
        );
        assert_eq!(hits.len(), 1, "ground under x={x}");
        assert!(approx_eq(hits[0].point.y, game::GROUND_Y));
    }

    let reach = 0.6;
    let near_right = Vec3::new(game::WALL_X - 0.3, 1.0, 0.0);
    let near_left = Vec3::new(-game::WALL_X + 0.3, 1.0, 0.0);
    assert!(probe(scene, near_right, DirectionSignal::Right, reach, CollisionLayers::WALL));
    assert!(probe(scene, near_left, DirectionSignal::Left, reach, CollisionLayers::WALL));
    assert!(!probe(scene, near_right, DirectionSignal::Left, reach, CollisionLayers::WALL));
    assert!(!probe(scene, Vec3::new(0.0, 1.0, 0.0), DirectionSignal::Right, reach, CollisionLayers::WALL));
}

#[test]
fn test_wall_jump_off_demo_level_wall() {
    let config = GameConfig {
        wall_jump: true,
        ..GameConfig::default()
    };
    let mut world = make_world(config);
    game::spawn_demo_level(&mut world);
    let player = game::spawn_player(&mut world, Vec3::new(game::WALL_X - 0.4, 1.0, 0.0))
        .expect("player should spawn");
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, false, true);
    tick(&mut world, &mut fixed);
    set_buttons(&mut world, false, false, false);
    set_grounded(&mut world, player, false);
    tick(&mut world, &mut fixed);

    set_buttons(&mut world, false, true, true);
    tick(&mut world, &mut fixed);
    assert_eq!(state(&world, player).jump_phase, JumpPhase::Wall);
}

#[test]
fn test_double_jump_once_per_airtime() {
    let config = GameConfig {
        double_jump: true,
        ..GameConfig::default()
    };
    let mut world = make_world(config);
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, false, true);
    tick(&mut world, &mut fixed);
    set_grounded(&mut world, player, false);
    for _ in 0..3 {
        set_buttons(&mut world, false, false, false);
        tick(&mut world, &mut fixed);
        set_buttons(&mut world, false, false, true);
        tick(&mut world, &mut fixed);
    }
    assert_eq!(body(&world, player).pending_impulses().len(), 2);
    assert_eq!(state(&world, player).jump_phase, JumpPhase::DoubleJumped);
}

// --- start and refusal ---

#[test]
fn test_spawn_refused_without_curve() {
    let mut world = make_world(GameConfig::default());
    world.resource_mut::<CurveStore>().curves.clear();

    let result = game::spawn_player(&mut world, Vec3::ZERO);
    assert!(matches!(result, Err(ConfigurationError::MissingCurve(ref k)) if k == "jump"));
    let mut query = world.query::<&MovementController>();
    assert_eq!(query.iter(&world).count(), 0);
    assert_eq!(world.resource::<AnimationBlender>().created_count(), 0);
}

#[test]
fn test_spawn_refused_without_clip() {
    let mut world = make_world(GameConfig::default());
    world.resource_mut::<ClipStore>().clips.remove("run");

    let result = game::spawn_player(&mut world, Vec3::ZERO);
    assert!(matches!(result, Err(ConfigurationError::MissingClip(ref k)) if k == "run"));
    assert_eq!(world.resource::<AnimationBlender>().created_count(), 0);
}

#[test]
fn test_start_system_leaves_controller_inactive_on_empty_curve() {
    let mut world = make_world(GameConfig::default());
    world
        .resource_mut::<CurveStore>()
        .insert("jump", GravityCurve::new(Vec::new()));
    let entity = world
        .spawn((MovementController::default(), CharacterBody::grounded()))
        .id();
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, true, true);
    tick(&mut world, &mut fixed);
    assert!(world.get::<MovementState>(entity).is_none());
    assert!(body(&world, entity).pending_impulses().is_empty());
}

#[test]
fn test_start_system_activates_controller() {
    let mut world = make_world(GameConfig::default());
    let entity = world
        .spawn((MovementController::default(), CharacterBody::grounded()))
        .id();
    let mut fixed = game::fixed_schedule();

    set_buttons(&mut world, false, true, false);
    tick(&mut world, &mut fixed);
    assert!(approx_eq(state(&world, entity).horizontal_speed, DT));
}

// --- animation blending ---

#[test]
fn test_blend_start_system_acquires_evaluators() {
    let mut world = make_world(GameConfig::default());
    let entity = world.spawn(BlendController::default()).id();
    let mut frames = game::frame_schedule();

    frame(&mut world, &mut frames, 0);
    assert!(world.get::<BlendEvaluators>(entity).is_some());
    assert_eq!(world.resource::<AnimationBlender>().live_count(), 4);

    frame(&mut world, &mut frames, TICKS_PER_SECOND / 10);
    let stack = world.get::<BlendStack>(entity).expect("blend stack");
    assert_eq!(stack.ops.len(), 3);
    assert!(matches!(stack.ops[2], BlendOp::Blend { .. }));
}

#[test]
fn test_blend_start_refused_without_clip() {
    let mut world = make_world(GameConfig::default());
    world.resource_mut::<ClipStore>().clips.remove("jump");
    let entity = world.spawn(BlendController::default()).id();
    let mut frames = game::frame_schedule();

    frame(&mut world, &mut frames, TICKS_PER_SECOND / 10);
    assert!(world.get::<BlendEvaluators>(entity).is_none());
    assert_eq!(world.resource::<AnimationBlender>().created_count(), 0);
}

#[test]
fn test_evaluators_released_on_despawn() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    assert_eq!(world.resource::<AnimationBlender>().live_count(), 4);

    world.despawn(player);
    let blender = world.resource::<AnimationBlender>();
    assert_eq!(blender.live_count(), 0);
    assert_eq!(blender.released_count(), 4);
}

#[test]
fn test_evaluators_released_on_remove() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);

    world.entity_mut(player).remove::<BlendEvaluators>();
    assert_eq!(world.resource::<AnimationBlender>().live_count(), 0);
}

#[test]
fn test_evaluators_released_when_controller_removed() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);

    world.entity_mut(player).remove::<BlendController>();
    world.flush();
    let blender = world.resource::<AnimationBlender>();
    assert_eq!(blender.live_count(), 0);
    assert_eq!(blender.released_count(), 4);
    assert!(world.get::<BlendEvaluators>(player).is_none());

    // Despawning afterwards releases nothing twice.
    world.despawn(player);
    assert_eq!(world.resource::<AnimationBlender>().released_count(), 4);
}

#[test]
fn test_slow_speed_blends_idle_and_walk() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut frames = game::frame_schedule();

    world.resource_mut::<Channel<HorizontalSpeed>>().broadcast(0.1);
    frame(&mut world, &mut frames, TICKS_PER_SECOND / 60);
    let blend = world.get::<BlendController>(player).expect("blend controller");
    assert_eq!(blend.state.lerp_pair, (ClipSlot::Idle, ClipSlot::Walk));
    assert!((blend.state.lerp_factor - 0.6325).abs() < 1e-3);

    // No new broadcast: the last speed is kept.
    frame(&mut world, &mut frames, TICKS_PER_SECOND / 60);
    let blend = world.get::<BlendController>(player).expect("blend controller");
    assert!((blend.state.lerp_factor - 0.6325).abs() < 1e-3);
}

#[test]
fn test_normalized_time_stays_in_unit_range() {
    let mut world = make_world(GameConfig::default());
    world
        .resource_mut::<ClipStore>()
        .insert("walk", AnimationClip { duration: 0 });
    let player = spawn(&mut world);
    let mut frames = game::frame_schedule();
    let mut rng = fastrand::Rng::with_seed(99);

    for _ in 0..2000 {
        if rng.bool() {
            let speed = rng.f32() * 24.0 - 12.0;
            world.resource_mut::<Channel<HorizontalSpeed>>().broadcast(speed);
        }
        frame(&mut world, &mut frames, rng.i64(0..TICKS_PER_SECOND / 5));
        let blend = world.get::<BlendController>(player).expect("blend controller");
        let t = blend.state.normalized_time;
        assert!((0.0..1.0).contains(&t), "normalized time {t}");
        assert!((0.0..=1.0).contains(&blend.state.lerp_factor));
    }
}

#[test]
fn test_facing_change_rotates_character() {
    let mut world = make_world(GameConfig::default());
    let player = spawn(&mut world);
    let mut fixed = game::fixed_schedule();
    let mut frames = game::frame_schedule();
    assert!(approx_eq(world.get::<Rotation>(player).expect("rotation").yaw_degrees, 90.0));

    // Already facing right: nothing published.
    set_buttons(&mut world, false, true, false);
    tick(&mut world, &mut fixed);
    assert_eq!(world.resource::<Channel<Facing>>().sequence(), 0);

    set_buttons(&mut world, true, false, false);
    tick(&mut world, &mut fixed);
    tick(&mut world, &mut fixed);
    let facing = world.resource::<Channel<Facing>>();
    assert_eq!(facing.sequence(), 1);
    assert_eq!(facing.peek(), Some(&DirectionSignal::Left));

    frame(&mut world, &mut frames, TICKS_PER_SECOND / 60);
    assert!(approx_eq(world.get::<Rotation>(player).expect("rotation").yaw_degrees, -90.0));
}
