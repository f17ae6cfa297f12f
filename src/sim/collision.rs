//! Collision detection between the submarine and canyon entities
//!
//! Axis-aligned boxes only. Any overlap (including touching faces) is a
//! crash; there is no response, just the terminal event.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::player::Submarine;
use super::state::{Entity, EntityId};
use super::store::EntityStore;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Box enclosing this box after rotating it about the origin and translating
    pub fn transformed(&self, rotation: Quat, translation: Vec3) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = rotation * corner + translation;
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    /// Overlap test; touching counts
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Find the first entity the submarine overlaps.
///
/// Only entities within `window` of the sub along z are tested. Walls are
/// checked before rocks, each in store order.
pub fn detect_collision(sub: &Submarine, store: &EntityStore, window: f32) -> Option<EntityId> {
    let sub_box = sub.bounds();
    let near = |e: &&Entity| (sub.pos.z - e.z()).abs() < window;

    store
        .walls()
        .iter()
        .chain(store.rocks().iter())
        .filter(near)
        .find(|e| sub_box.intersects(&e.bounds()))
        .map(|e| e.id)
}
