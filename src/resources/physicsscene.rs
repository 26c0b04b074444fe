//! Static collision scene and ray queries.
//!
//! The physics engine is external; the controller only needs penetrating
//! raycasts against static geometry. [`PhysicsScene`] is a flat snapshot of
//! the world's [`BoxCollider`](crate::components::boxcollider::BoxCollider)s,
//! rebuilt by [`sync_physics_scene`](crate::systems::physicsscene::sync_physics_scene),
//! and answers queries through the [`RaycastQuery`] trait so hosts can plug in
//! a real engine instead.

use bevy_ecs::prelude::{Entity, Resource};
use bitflags::bitflags;
use glam::Vec3;
use smallvec::SmallVec;

use crate::components::boxcollider::segment_aabb;

bitflags! {
    /// Collision layer membership and ray filter mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        const DEFAULT = 1 << 0;
        const STATIC = 1 << 1;
        const CHARACTER = 1 << 2;
        /// Walkable ground, classified as a ground click.
        const GROUND = 1 << 3;
        /// Loot crates, classified as a loot click.
        const LOOT_CRATE = 1 << 4;
        /// Surfaces a character may kick off from.
        const WALL = 1 << 5;
        const TRIGGER = 1 << 6;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        CollisionLayers::DEFAULT
    }
}

/// Hit list returned by ray queries, nearest first.
pub type HitList = SmallVec<[RayHit; 4]>;

/// One surface crossed by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space entry point.
    pub point: Vec3,
    /// Entry fraction along the ray in `[0, 1]`.
    pub fraction: f32,
    pub layers: CollisionLayers,
    /// Entity owning the collider, if it came from the ECS world.
    pub entity: Option<Entity>,
}

/// Penetrating ray queries against the physics world.
pub trait RaycastQuery {
    /// Every collider crossed by the segment `origin -> end` whose layers
    /// intersect `filter`, sorted nearest first.
    fn raycast_penetrating(&self, origin: Vec3, end: Vec3, filter: CollisionLayers) -> HitList;
}

/// World-space static collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCollider {
    pub min: Vec3,
    pub max: Vec3,
    pub layers: CollisionLayers,
    pub entity: Option<Entity>,
}

/// Flat list of static colliders.
#[derive(Resource, Debug, Default, Clone)]
pub struct PhysicsScene {
    pub colliders: Vec<SceneCollider>,
}

impl PhysicsScene {
    /// Add a box spanning `min..max`.
    pub fn add_box(&mut self, min: Vec3, max: Vec3, layers: CollisionLayers) {
        self.colliders.push(SceneCollider {
            min: min.min(max),
            max: min.max(max),
            layers,
            entity: None,
        });
    }

    pub fn clear(&mut self) {
        self.colliders.clear();
    }
}

impl RaycastQuery for PhysicsScene {
    fn raycast_penetrating(&self, origin: Vec3, end: Vec3, filter: CollisionLayers) -> HitList {
        let mut hits: HitList = self
            .colliders
            .iter()
            .filter(|c| c.layers.intersects(filter))
            .filter_map(|c| {
                segment_aabb(origin, end, c.min, c.max).map(|fraction| RayHit {
                    point: origin.lerp(end, fraction),
                    fraction,
                    layers: c.layers,
                    entity: c.entity,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        hits
    }
}
