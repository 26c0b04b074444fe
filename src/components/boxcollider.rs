use bevy_ecs::prelude::Component;
use glam::Vec3;

use crate::resources::physicsscene::CollisionLayers;

/// Axis-aligned box collider, relative to the entity [`Position`](super::position::Position).
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec3,
    pub offset: Vec3,
    /// Layers this collider belongs to. Ray filters test against these.
    pub layers: CollisionLayers,
}

impl BoxCollider {
    /// Create a BoxCollider with given size on the default layer.
    pub fn new(size: Vec3) -> Self {
        Self {
            size,
            offset: Vec3::ZERO,
            layers: CollisionLayers::DEFAULT,
        }
    }

    /// Create a BoxCollider of the given size centred on the entity position.
    pub fn centered(size: Vec3) -> Self {
        Self::new(size).with_offset(-size * 0.5)
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Modify BoxCollider with given layers
    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vec3) -> (Vec3, Vec3) {
        let p0 = position + self.offset;
        let p1 = p0 + self.size;
        (p0.min(p1), p0.max(p1))
    }
}

/// Segment vs AABB slab test.
///
/// Returns the entry fraction along `origin -> end` in `[0, 1]`, or `None`
/// when the segment misses. A segment starting inside the box hits at 0.
pub fn segment_aabb(origin: Vec3, end: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let dir = end - origin;
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() <= f32::EPSILON {
            // Parallel to this slab: must already be inside it.
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}
