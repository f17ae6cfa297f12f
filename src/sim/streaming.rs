//! World streaming: extend the canyon ahead, drop it behind
//!
//! The run heads toward -z, so "ahead" is smaller z and "behind" is larger z.

use rand::Rng;

use super::state::EntityId;
use super::store::EntityStore;
use super::world::generate_segment;
use crate::tuning::WorldTuning;

/// What changed in the store during one streaming pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamReport {
    pub spawned: Vec<EntityId>,
    pub culled: Vec<EntityId>,
}

/// Generate ahead of the player until the frontier is far enough away,
/// then cull everything that has fallen behind.
pub fn stream_world<R: Rng + ?Sized>(
    store: &mut EntityStore,
    player_z: f32,
    rng: &mut R,
    tuning: &WorldTuning,
) -> StreamReport {
    let mut report = StreamReport::default();
    let horizon = player_z - tuning.generate_ahead;

    // Batches of `generate_span`, one segment every `segment_spacing`
    let mut frontier = store.frontier_z().unwrap_or(player_z);
    while frontier > horizon {
        let batch_end = frontier - tuning.generate_span;
        let mut z = frontier - tuning.segment_spacing;
        while z >= batch_end {
            let segment = generate_segment(z, rng, tuning, true);
            report
                .spawned
                .extend(segment.into_descs().map(|d| store.insert(d)));
            z -= tuning.segment_spacing;
        }
        frontier = store.frontier_z().unwrap_or(batch_end);
    }

    let cull_line = player_z + tuning.cull_distance;
    report.culled = store.remove_where(|e| e.z() > cull_line);

    if !report.spawned.is_empty() {
        log::debug!(
            "Streamed {} entities ahead of z={:.1} (frontier {:.1}), culled {}",
            report.spawned.len(),
            player_z,
            frontier,
            report.culled.len()
        );
    }

    report
}
