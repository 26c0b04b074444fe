//! Game configuration resource.
//!
//! Author-time tuning for the character controller, loaded from an INI file.
//! Provides defaults for safe startup and methods to load/save configuration.
//! Values are read once at start and treated as immutable while running.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! tick_rate = 60
//!
//! [movement]
//! max_velocity_x = 10
//! move_speed = 1
//! jump_force = 10
//! base_gravity = 10
//! gravity_curve = jump
//! wall_jump = false
//! double_jump = false
//! wall_probe_depth = 0.6
//!
//! [animation]
//! walk_threshold = 0.25
//! time_scale = 1
//! reference_speed = 1
//! idle_clip = idle
//! walk_clip = walk
//! run_clip = run
//! jump_clip = jump
//!
//! [assets]
//! curves = assets/curves.json
//! clips = assets/clips.json
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_MAX_VELOCITY_X: f32 = 10.0;
const DEFAULT_MOVE_SPEED: f32 = 1.0;
const DEFAULT_JUMP_FORCE: f32 = 10.0;
const DEFAULT_BASE_GRAVITY: f32 = 10.0;
const DEFAULT_GRAVITY_CURVE: &str = "jump";
const DEFAULT_WALL_PROBE_DEPTH: f32 = 0.6;
const DEFAULT_WALK_THRESHOLD: f32 = 0.25;
const DEFAULT_TIME_SCALE: f64 = 1.0;
const DEFAULT_REFERENCE_SPEED: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";
const DEFAULT_CURVES_PATH: &str = "assets/curves.json";
const DEFAULT_CLIPS_PATH: &str = "assets/clips.json";

/// Controller configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Fixed simulation ticks per second.
    pub tick_rate: u32,
    /// Horizontal speed clamp.
    pub max_velocity_x: f32,
    /// Horizontal acceleration per second of held input.
    pub move_speed: f32,
    /// Magnitude of the jump impulse.
    pub jump_force: f32,
    /// Gravity magnitude before curve shaping.
    pub base_gravity: f32,
    /// Key of the gravity curve in the curve store.
    pub gravity_curve: String,
    /// Allow airborne jumps off walls detected by the collision probe.
    pub wall_jump: bool,
    /// Allow one extra airborne jump.
    pub double_jump: bool,
    /// How far ahead the wall probe reaches.
    pub wall_probe_depth: f32,
    /// Speed magnitude below which idle and walk are blended.
    pub walk_threshold: f32,
    /// Animation playback speed multiplier.
    pub time_scale: f64,
    /// Speed that maps to a blend magnitude of 1.0.
    pub reference_speed: f32,
    pub idle_clip: String,
    pub walk_clip: String,
    pub run_clip: String,
    pub jump_clip: String,
    /// Gravity curve asset file.
    pub curves_path: PathBuf,
    /// Animation clip asset file.
    pub clips_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            max_velocity_x: DEFAULT_MAX_VELOCITY_X,
            move_speed: DEFAULT_MOVE_SPEED,
            jump_force: DEFAULT_JUMP_FORCE,
            base_gravity: DEFAULT_BASE_GRAVITY,
            gravity_curve: DEFAULT_GRAVITY_CURVE.to_string(),
            wall_jump: false,
            double_jump: false,
            wall_probe_depth: DEFAULT_WALL_PROBE_DEPTH,
            walk_threshold: DEFAULT_WALK_THRESHOLD,
            time_scale: DEFAULT_TIME_SCALE,
            reference_speed: DEFAULT_REFERENCE_SPEED,
            idle_clip: "idle".to_string(),
            walk_clip: "walk".to_string(),
            run_clip: "run".to_string(),
            jump_clip: "jump".to_string(),
            curves_path: PathBuf::from(DEFAULT_CURVES_PATH),
            clips_path: PathBuf::from(DEFAULT_CLIPS_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Length of one simulation tick in seconds.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        let float = |section: &str, key: &str| config.getfloat(section, key).ok().flatten();
        let boolean = |section: &str, key: &str| config.getbool(section, key).ok().flatten();

        // [simulation] section
        if let Some(rate) = config.getuint("simulation", "tick_rate").ok().flatten() {
            self.tick_rate = (rate as u32).max(1);
        }

        // [movement] section
        if let Some(v) = float("movement", "max_velocity_x") {
            self.max_velocity_x = v as f32;
        }
        if let Some(v) = float("movement", "move_speed") {
            self.move_speed = v as f32;
        }
        if let Some(v) = float("movement", "jump_force") {
            self.jump_force = v as f32;
        }
        if let Some(v) = float("movement", "base_gravity") {
            self.base_gravity = v as f32;
        }
        if let Some(v) = config.get("movement", "gravity_curve") {
            self.gravity_curve = v;
        }
        if let Some(v) = boolean("movement", "wall_jump") {
            self.wall_jump = v;
        }
        if let Some(v) = boolean("movement", "double_jump") {
            self.double_jump = v;
        }
        if let Some(v) = float("movement", "wall_probe_depth") {
            self.wall_probe_depth = v as f32;
        }

        // [animation] section
        if let Some(v) = float("animation", "walk_threshold") {
            self.walk_threshold = v as f32;
        }
        if let Some(v) = float("animation", "time_scale") {
            self.time_scale = v;
        }
        if let Some(v) = float("animation", "reference_speed") {
            self.reference_speed = v as f32;
        }
        if let Some(v) = config.get("animation", "idle_clip") {
            self.idle_clip = v;
        }
        if let Some(v) = config.get("animation", "walk_clip") {
            self.walk_clip = v;
        }
        if let Some(v) = config.get("animation", "run_clip") {
            self.run_clip = v;
        }
        if let Some(v) = config.get("animation", "jump_clip") {
            self.jump_clip = v;
        }

        // [assets] section
        if let Some(v) = config.get("assets", "curves") {
            self.curves_path = PathBuf::from(v);
        }
        if let Some(v) = config.get("assets", "clips") {
            self.clips_path = PathBuf::from(v);
        }

        info!(
            "Loaded config: tick_rate={}, max_velocity_x={}, move_speed={}, jump_force={}, curve='{}', walk_threshold={}",
            self.tick_rate,
            self.max_velocity_x,
            self.move_speed,
            self.jump_force,
            self.gravity_curve,
            self.walk_threshold
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("simulation", "tick_rate", Some(self.tick_rate.to_string()));

        config.set("movement", "max_velocity_x", Some(self.max_velocity_x.to_string()));
        config.set("movement", "move_speed", Some(self.move_speed.to_string()));
        config.set("movement", "jump_force", Some(self.jump_force.to_string()));
        config.set("movement", "base_gravity", Some(self.base_gravity.to_string()));
        config.set("movement", "gravity_curve", Some(self.gravity_curve.clone()));
        config.set("movement", "wall_jump", Some(self.wall_jump.to_string()));
        config.set("movement", "double_jump", Some(self.double_jump.to_string()));
        config.set(
            "movement",
            "wall_probe_depth",
            Some(self.wall_probe_depth.to_string()),
        );

        config.set("animation", "walk_threshold", Some(self.walk_threshold.to_string()));
        config.set("animation", "time_scale", Some(self.time_scale.to_string()));
        config.set("animation", "reference_speed", Some(self.reference_speed.to_string()));
        config.set("animation", "idle_clip", Some(self.idle_clip.clone()));
        config.set("animation", "walk_clip", Some(self.walk_clip.clone()));
        config.set("animation", "run_clip", Some(self.run_clip.clone()));
        config.set("animation", "jump_clip", Some(self.jump_clip.clone()));

        config.set(
            "assets",
            "curves",
            Some(self.curves_path.to_string_lossy().into_owned()),
        );
        config.set(
            "assets",
            "clips",
            Some(self.clips_path.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
