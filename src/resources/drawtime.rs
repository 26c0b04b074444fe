//! Render clock.
//!
//! Animation playback advances on the variable frame clock, which is kept
//! separate from the fixed simulation clock in
//! [`WorldTime`](crate::resources::worldtime::WorldTime). Times are stored as
//! integer ticks of 100 ns so that playback wraparound never accumulates
//! floating-point drift.
use std::time::Duration;

use bevy_ecs::prelude::Resource;

/// Integer time unit used for animation math (100 ns).
pub type Ticks = i64;

/// Number of [`Ticks`] in one second.
pub const TICKS_PER_SECOND: Ticks = 10_000_000;

/// Convert a duration to ticks, saturating at `Ticks::MAX`.
pub fn duration_to_ticks(duration: Duration) -> Ticks {
    Ticks::try_from(duration.as_nanos() / 100).unwrap_or(Ticks::MAX)
}

/// Convert seconds to ticks, rounding to the nearest tick.
pub fn seconds_to_ticks(seconds: f64) -> Ticks {
    (seconds * TICKS_PER_SECOND as f64).round() as Ticks
}

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawTime {
    /// Ticks elapsed during the last rendered frame.
    pub elapsed: Ticks,
    /// Ticks since the first frame.
    pub total: Ticks,
    /// Number of rendered frames.
    pub frame_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_to_ticks() {
        assert_eq!(duration_to_ticks(Duration::from_secs(1)), TICKS_PER_SECOND);
        assert_eq!(duration_to_ticks(Duration::from_millis(16)), 160_000);
        assert_eq!(duration_to_ticks(Duration::from_nanos(99)), 0);
    }

    #[test]
    fn test_seconds_to_ticks() {
        assert_eq!(seconds_to_ticks(0.5), 5_000_000);
        assert_eq!(seconds_to_ticks(0.0), 0);
    }
}
