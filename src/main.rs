//! PaddyTown controller demo.
//!
//! A headless run of the character controller using:
//! - **bevy_ecs** for entity-component-system architecture
//! - **glam** for vector math
//! - a stand-in ground plane instead of a physics engine
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when absent) and the JSON assets it names
//! 2. Build the world, the level geometry and the player
//! 3. For every jittered render frame:
//!    - run as many fixed simulation ticks as the accumulator allows, each one
//!      feeding input, running the fixed schedule and integrating the body
//!    - advance the render clock and run the frame schedule
//! 4. Log a status line once per simulated second
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --ticks 600 --seed 42
//! ```

use std::path::PathBuf;
use std::time::Duration;

use bevy_ecs::prelude::*;
use clap::Parser;
use glam::{Mat4, Vec2, Vec3};
use log::{error, info, warn};

use paddytown::components::animation::BlendController;
use paddytown::components::characterbody::CharacterBody;
use paddytown::components::movement::MovementState;
use paddytown::components::position::Position;
use paddytown::game::{self, GROUND_Y, WALL_X};
use paddytown::resources::gameconfig::GameConfig;
use paddytown::resources::input::{InputAction, InputState};
use paddytown::resources::physicsscene::PhysicsScene;
use paddytown::systems::picking::screen_to_world_raycast;
use paddytown::systems::time::{update_draw_time, update_world_time};

/// PaddyTown character controller demo
#[derive(Parser)]
#[command(version, about = "Headless run of the PaddyTown platformer character controller.")]
struct Cli {
    /// Path of the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of fixed simulation ticks to run.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seed for random input. Without it a scripted input sequence is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Average render frames per second.
    #[arg(long, default_value_t = 144.0)]
    fps: f32,
}

/// Source of per-tick button states.
enum InputDriver {
    Scripted,
    Random {
        rng: fastrand::Rng,
        axis: i32,
        jump_ticks: u32,
    },
}

impl InputDriver {
    fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => InputDriver::Random {
                rng: fastrand::Rng::with_seed(seed),
                axis: 0,
                jump_ticks: 0,
            },
            None => InputDriver::Scripted,
        }
    }

    /// Held state of (left, right, jump) for simulation tick `tick`.
    fn buttons(&mut self, tick: u64) -> (bool, bool, bool) {
        match self {
            InputDriver::Scripted => {
                let phase = tick % 240;
                let left = (100..190).contains(&phase);
                let right = phase < 90;
                let jump = (40..52).contains(&(tick % 120));
                (left, right, jump)
            }
            InputDriver::Random {
                rng,
                axis,
                jump_ticks,
            } => {
                if rng.u8(..) < 12 {
                    *axis = rng.i32(-1..=1);
                }
                if *jump_ticks > 0 {
                    *jump_ticks -= 1;
                } else if rng.u8(..) < 8 {
                    *jump_ticks = rng.u32(1..25);
                }
                (*axis < 0, *axis > 0, *jump_ticks > 0)
            }
        }
    }
}

/// Stand-in for the physics engine: unit mass, flat ground, two walls.
fn integrate_body(world: &mut World, player: Entity, dt: f32, vertical: &mut f32) {
    let mut query = world.query::<(&mut Position, &mut CharacterBody)>();
    let Ok((mut position, mut body)) = query.get_mut(world, player) else {
        return;
    };

    for impulse in body.drain_impulses() {
        *vertical += impulse.y;
    }
    *vertical += body.gravity().y * dt;

    let half_width = game::PLAYER_SIZE.x * 0.5;
    position.pos.x = (position.pos.x + body.velocity().x * dt)
        .clamp(-WALL_X + half_width, WALL_X - half_width);
    position.pos.y += *vertical * dt;

    if position.pos.y <= GROUND_Y {
        position.pos.y = GROUND_Y;
        *vertical = vertical.max(0.0);
        body.set_grounded(true);
    } else {
        body.set_grounded(false);
    }
}

fn log_status(world: &mut World, player: Entity) {
    let mut query = world.query::<(&Position, &MovementState, &BlendController)>();
    if let Ok((position, state, blend)) = query.get(world, player) {
        info!(
            "pos=({:.2}, {:.2}) speed={:+.2} facing={:?} jump={:?} blend={:?}@{:.2} t={:.3}",
            position.pos.x,
            position.pos.y,
            state.horizontal_speed,
            state.facing,
            state.jump_phase,
            blend.state.lerp_pair,
            blend.state.lerp_factor,
            blend.state.normalized_time,
        );
    }
}

/// Pick straight down through the player from an orthographic camera.
fn log_pick_below(world: &mut World, player: Entity) {
    let Some(x) = world.get::<Position>(player).map(|p| p.pos.x) else {
        return;
    };
    let eye = Vec3::new(x, 20.0, 0.0);
    let view = Mat4::look_at_rh(eye, Vec3::new(x, 0.0, 0.0), Vec3::NEG_Z);
    let proj = Mat4::orthographic_rh(-8.0, 8.0, -4.5, 4.5, 0.1, 50.0);
    let result = screen_to_world_raycast(
        Vec2::splat(0.5),
        (proj * view).inverse(),
        world.resource::<PhysicsScene>(),
    );
    info!(
        "Click below player: {:?} at {:.2} (entity {:?})",
        result.kind, result.world_position, result.clicked_entity
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("PaddyTown controller demo");
    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    let tick = config.tick_seconds();
    let ticks_per_status = u64::from(config.tick_rate.max(1));

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    game::init_world(&mut world, config);
    if let Err(e) = game::load_assets(&mut world) {
        error!("Failed to load assets: {}", e);
        std::process::exit(1);
    }
    game::spawn_demo_level(&mut world);
    let player = match game::spawn_player(&mut world, Vec3::new(0.0, GROUND_Y, 0.0)) {
        Ok(player) => player,
        Err(e) => {
            error!("Failed to spawn player: {}", e);
            std::process::exit(1);
        }
    };

    let mut fixed = game::fixed_schedule();
    let mut frame = game::frame_schedule();

    let mut driver = InputDriver::new(cli.seed);
    let mut jitter = fastrand::Rng::with_seed(cli.seed.unwrap_or(0));
    let frame_seconds = 1.0 / cli.fps.max(1.0);
    let mut accumulator = 0.0_f32;
    let mut ticks_run = 0_u64;
    let mut vertical = 0.0_f32;

    // --------------- Main loop ---------------
    while ticks_run < cli.ticks {
        let frame_time = frame_seconds * (0.75 + jitter.f32() * 0.5);
        accumulator += frame_time;

        while accumulator >= tick && ticks_run < cli.ticks {
            accumulator -= tick;

            let (left, right, jump) = driver.buttons(ticks_run);
            {
                let mut input = world.resource_mut::<InputState>();
                input.set_action(InputAction::MoveLeft, left);
                input.set_action(InputAction::MoveRight, right);
                input.set_action(InputAction::Jump, jump);
            }

            update_world_time(&mut world, tick);
            fixed.run(&mut world);
            integrate_body(&mut world, player, tick, &mut vertical);

            ticks_run += 1;
            if ticks_run % ticks_per_status == 0 {
                log_status(&mut world, player);
            }
        }

        update_draw_time(&mut world, Duration::from_secs_f32(frame_time));
        frame.run(&mut world);

        world.clear_trackers(); // Clear changed components for next frame
    }

    log_pick_below(&mut world, player);
    info!("Ran {} simulation ticks", ticks_run);
}
