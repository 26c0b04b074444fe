//! Screen-space click picking.
//!
//! [`screen_to_world_raycast`] unprojects a normalized screen position
//! (`0..1` on both axes, origin top-left) through the inverse view-projection
//! matrix, casts a penetrating ray from the near to the far plane and reports
//! the nearest ground or loot crate surface it crosses.

use bevy_ecs::prelude::Entity;
use glam::{Mat4, Vec2, Vec3};

use crate::resources::physicsscene::{CollisionLayers, RayHit, RaycastQuery};

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickType {
    #[default]
    Empty,
    Ground,
    LootCrate,
}

impl ClickType {
    /// Classify a surface by its layers. Loot crates win over ground.
    pub fn from_layers(layers: CollisionLayers) -> Self {
        if layers.contains(CollisionLayers::LOOT_CRATE) {
            ClickType::LootCrate
        } else if layers.contains(CollisionLayers::GROUND) {
            ClickType::Ground
        } else {
            ClickType::Empty
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickResult {
    pub kind: ClickType,
    pub world_position: Vec3,
    pub clicked_entity: Option<Entity>,
}

impl ClickResult {
    pub fn is_hit(&self) -> bool {
        self.kind != ClickType::Empty
    }

    fn from_hit(kind: ClickType, hit: &RayHit) -> Self {
        Self {
            kind,
            world_position: hit.point,
            clicked_entity: hit.entity,
        }
    }
}

/// Near and far plane points under a normalized screen position.
pub fn unproject(screen_pos: Vec2, inv_view_proj: Mat4) -> (Vec3, Vec3) {
    let ndc_x = screen_pos.x * 2.0 - 1.0;
    let ndc_y = 1.0 - screen_pos.y * 2.0;
    let near = inv_view_proj.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
    let far = inv_view_proj.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
    (near, far)
}

/// Pick the nearest ground or loot crate surface under `screen_pos`.
///
/// Every layer is queried, triggers included; surfaces that are neither
/// ground nor loot are skipped rather than blocking the ray.
pub fn screen_to_world_raycast(
    screen_pos: Vec2,
    inv_view_proj: Mat4,
    scene: &impl RaycastQuery,
) -> ClickResult {
    let (near, far) = unproject(screen_pos, inv_view_proj);
    scene
        .raycast_penetrating(near, far, CollisionLayers::all())
        .iter()
        .filter_map(|hit| match ClickType::from_layers(hit.layers) {
            ClickType::Empty => None,
            kind => Some((kind, hit)),
        })
        .min_by(|(_, a), (_, b)| {
            a.point
                .distance_squared(near)
                .total_cmp(&b.point.distance_squared(near))
        })
        .map(|(kind, hit)| ClickResult::from_hit(kind, hit))
        .unwrap_or_default()
}
