//! Directional collision probe.
//!
//! Casts a penetrating ray from the character along its horizontal facing
//! axis and reports whether any surface on the filtered layers lies within
//! reach. Used by the movement controller to allow wall-assisted jumps.
//! Only hit/no-hit is reported; distance and normal are not needed yet.

use glam::Vec3;

use crate::events::topics::DirectionSignal;
use crate::resources::physicsscene::{CollisionLayers, RaycastQuery};

/// Whether a surface matching `filter` lies within `max_depth` ahead of
/// `origin` along `facing`.
pub fn probe(
    scene: &impl RaycastQuery,
    origin: Vec3,
    facing: DirectionSignal,
    max_depth: f32,
    filter: CollisionLayers,
) -> bool {
    if max_depth <= 0.0 {
        return false;
    }
    let end = origin + Vec3::X * facing.sign() * max_depth;
    !scene.raycast_penetrating(origin, end, filter).is_empty()
}
