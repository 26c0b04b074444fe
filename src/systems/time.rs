//! Clock update functions.
//!
//! Both run outside the schedules, driven by the host loop:
//! [`update_world_time`] once per fixed simulation tick and
//! [`update_draw_time`] once per rendered frame.
use std::time::Duration;

use bevy_ecs::prelude::*;

use crate::resources::drawtime::{DrawTime, duration_to_ticks};
use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled tick length in seconds. The function
/// applies the current `time_scale` and writes both `elapsed` and `delta`.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}

/// Record a rendered frame of length `frame` on the `DrawTime` resource.
pub fn update_draw_time(world: &mut World, frame: Duration) {
    let mut dt = world.resource_mut::<DrawTime>();
    let ticks = duration_to_ticks(frame);
    dt.elapsed = ticks;
    dt.total += ticks;
    dt.frame_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::drawtime::TICKS_PER_SECOND;

    #[test]
    fn test_update_world_time_scales_delta() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            time_scale: 0.5,
            ..Default::default()
        });
        update_world_time(&mut world, 0.2);
        update_world_time(&mut world, 0.2);
        let wt = world.resource::<WorldTime>();
        assert!((wt.delta - 0.1).abs() < 1e-6);
        assert!((wt.elapsed - 0.2).abs() < 1e-6);
        assert_eq!(wt.frame_count, 2);
    }

    #[test]
    fn test_update_draw_time_accumulates_ticks() {
        let mut world = World::new();
        world.insert_resource(DrawTime::default());
        update_draw_time(&mut world, Duration::from_millis(500));
        update_draw_time(&mut world, Duration::from_millis(250));
        let dt = world.resource::<DrawTime>();
        assert_eq!(dt.elapsed, TICKS_PER_SECOND / 4);
        assert_eq!(dt.total, TICKS_PER_SECOND * 3 / 4);
        assert_eq!(dt.frame_count, 2);
    }
}
