//! Physics scene snapshot system.
//!
//! Rebuilds [`PhysicsScene`] from every entity carrying a [`Position`] and a
//! [`BoxCollider`], so ray queries made later in the tick see this tick's
//! geometry. Colliders inserted directly with
//! [`PhysicsScene::add_box`] (no owning entity) are kept.
use bevy_ecs::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::position::Position;
use crate::resources::physicsscene::{PhysicsScene, SceneCollider};

pub fn sync_physics_scene(
    query: Query<(Entity, &Position, &BoxCollider)>,
    mut scene: ResMut<PhysicsScene>,
) {
    scene.colliders.retain(|c| c.entity.is_none());
    for (entity, position, collider) in query.iter() {
        let (min, max) = collider.aabb(position.pos);
        scene.colliders.push(SceneCollider {
            min,
            max,
            layers: collider.layers,
            entity: Some(entity),
        });
    }
}
