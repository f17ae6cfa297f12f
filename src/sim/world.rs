//! Procedural canyon generation
//!
//! Each segment is a pair of wall slabs flanking the canyon at a given z,
//! occasionally with a rock floating between them. Generation is a pure
//! function of z and the random source; the caller owns insertion.

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use super::state::{EntityDesc, EntityId, EntityKind};
use super::store::EntityStore;
use crate::canyon_width;
use crate::tuning::WorldTuning;

/// Wall slab depth along z
pub const WALL_DEPTH: f32 = 8.0;

/// Local box half-extent of a unit-circumradius dodecahedron (golden ratio / sqrt 3)
pub const ROCK_BOX_RATIO: f32 = 0.934_172_4;

/// One slice of canyon
#[derive(Debug, Clone)]
pub struct Segment {
    pub left: EntityDesc,
    pub right: EntityDesc,
    pub rock: Option<EntityDesc>,
}

impl Segment {
    pub fn into_descs(self) -> impl Iterator<Item = EntityDesc> {
        [Some(self.left), Some(self.right), self.rock]
            .into_iter()
            .flatten()
    }
}

/// Build the segment at `z`. Rocks are only rolled when `allow_rock` is set.
pub fn generate_segment<R: Rng + ?Sized>(
    z: f32,
    rng: &mut R,
    tuning: &WorldTuning,
    allow_rock: bool,
) -> Segment {
    let width = canyon_width(z);
    let wall_x = width + tuning.wall_offset;

    let left = wall(EntityKind::WallLeft, -wall_x, z, 30.0..70.0, rng);
    let right = wall(EntityKind::WallRight, wall_x, z, 25.0..70.0, rng);

    let rock = if rng.random_bool(tuning.rock_chance) && allow_rock {
        let radius = rng.random_range(1.0..3.0);
        let x = rng.random::<f32>() * (width * 1.5) - width * 0.75;
        let y = rng.random_range(5.0..25.0);
        Some(EntityDesc {
            kind: EntityKind::Rock,
            pos: Vec3::new(x, y, z),
            // Unrotated box; collision re-boxes it under the rotation
            half_extents: Vec3::splat(radius * ROCK_BOX_RATIO),
            rotation: Vec3::new(
                rng.random::<f32>() * PI,
                rng.random::<f32>() * PI,
                rng.random::<f32>() * PI,
            ),
            shade: rng.random_range(0.2..0.4),
        })
    } else {
        None
    };

    Segment { left, right, rock }
}

fn wall<R: Rng + ?Sized>(
    kind: EntityKind,
    x: f32,
    z: f32,
    heights: std::ops::Range<f32>,
    rng: &mut R,
) -> EntityDesc {
    let shade = rng.random_range(0.3..0.5);
    let thickness = rng.random_range(10.0..15.0);
    let height: f32 = rng.random_range(heights);
    EntityDesc {
        kind,
        // Walls stand on the sea floor
        pos: Vec3::new(x, height / 2.0, z),
        half_extents: Vec3::new(thickness / 2.0, height / 2.0, WALL_DEPTH / 2.0),
        rotation: Vec3::ZERO,
        shade,
    }
}

/// Fill the opening stretch of canyon, returning the ids added
pub fn fill_initial<R: Rng + ?Sized>(
    store: &mut EntityStore,
    rng: &mut R,
    tuning: &WorldTuning,
) -> Vec<EntityId> {
    let mut spawned = Vec::new();
    let mut z = tuning.initial_z_min;
    while z <= tuning.initial_z_max {
        let allow_rock = z > tuning.initial_rock_min_z;
        let segment = generate_segment(z, rng, tuning, allow_rock);
        spawned.extend(segment.into_descs().map(|d| store.insert(d)));
        z += tuning.segment_spacing;
    }
    spawned
}
