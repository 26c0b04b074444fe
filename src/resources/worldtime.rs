//! Simulation clock.
//!
//! [`WorldTime`] advances once per fixed simulation tick. Movement and jump
//! timing read it; animation playback never does (see
//! [`DrawTime`](crate::resources::drawtime::DrawTime)).
use bevy_ecs::prelude::Resource;

/// Default fixed tick length in seconds (60 Hz).
pub const DEFAULT_TICK_SECONDS: f32 = 1.0 / 60.0;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Scaled simulation seconds since start.
    pub elapsed: f32,
    /// Scaled length of the current tick in seconds.
    pub delta: f32,
    pub time_scale: f32,
    /// Number of simulation ticks run so far.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}
