//! Active canyon entities
//!
//! Walls and rocks are kept in separate append-ordered lists. Removal is a
//! filter pass, so order after culling is insertion order, not z order.

use serde::Serialize;

use super::state::{Entity, EntityDesc, EntityId, EntityKind};

#[derive(Debug, Clone, Serialize)]
pub struct EntityStore {
    walls: Vec<Entity>,
    rocks: Vec<Entity>,
    /// z of the furthest-ahead generated segment (smallest z; the run heads to -z)
    frontier_z: Option<f32>,
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            walls: Vec::new(),
            rocks: Vec::new(),
            frontier_z: None,
            next_id: 1,
        }
    }

    /// Append an entity, returning its new id
    pub fn insert(&mut self, desc: EntityDesc) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let z = desc.pos.z;
        let entity = Entity::from_desc(id, desc);
        if entity.kind == EntityKind::Rock {
            self.rocks.push(entity);
        } else {
            self.walls.push(entity);
            self.frontier_z = Some(self.frontier_z.map_or(z, |f| f.min(z)));
        }
        id
    }

    /// Drop every entity matching `cull`, returning the removed ids
    pub fn remove_where(&mut self, mut cull: impl FnMut(&Entity) -> bool) -> Vec<EntityId> {
        let mut removed = Vec::new();
        for list in [&mut self.walls, &mut self.rocks] {
            list.retain(|e| {
                if cull(e) {
                    removed.push(e.id);
                    false
                } else {
                    true
                }
            });
        }
        removed
    }

    /// Empty the store. Ids keep counting so old handles never get reused.
    pub fn clear(&mut self) -> Vec<EntityId> {
        let ids = self.iter().map(|e| e.id).collect();
        self.walls.clear();
        self.rocks.clear();
        self.frontier_z = None;
        ids
    }

    /// Furthest-ahead wall segment z, if any walls were ever generated since the last clear
    pub fn frontier_z(&self) -> Option<f32> {
        self.frontier_z
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|e| e.id == id)
    }

    pub fn walls(&self) -> &[Entity] {
        &self.walls
    }

    pub fn rocks(&self) -> &[Entity] {
        &self.rocks
    }

    /// Walls first, then rocks
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.walls.iter().chain(self.rocks.iter())
    }

    pub fn len(&self) -> usize {
        self.walls.len() + self.rocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Test hook: place an entity directly
    #[cfg(test)]
    pub(crate) fn push_rock_at(&mut self, pos: glam::Vec3, half_extent: f32) -> EntityId {
        self.insert(EntityDesc {
            kind: EntityKind::Rock,
            pos,
            half_extents: glam::Vec3::splat(half_extent),
            rotation: glam::Vec3::ZERO,
            shade: 0.3,
        })
    }
}
