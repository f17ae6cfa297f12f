//! Render collaborator seam
//!
//! The simulation never draws. After each tick the host drains the
//! session's events into a `SceneHost`, which owns whatever scene graph
//! the platform provides.

use std::collections::HashMap;

use crate::camera::CameraRig;
use crate::sim::{Entity, EntityId, EntityKind, GameEvent, GameSession, TickInput, tick};
use crate::ui::HudView;

/// A 3D scene the game can populate and draw
pub trait SceneHost {
    /// Insert a mesh for a newly spawned entity
    fn add_entity(&mut self, entity: &Entity);
    /// Remove an entity's mesh. Unknown ids must be ignored.
    fn remove_entity(&mut self, id: EntityId);
    /// Push score / game-over state to the HUD
    fn set_hud(&mut self, hud: &HudView);
    /// Draw one frame: sub transform, bubbles, bursts, camera
    fn render(&mut self, session: &GameSession, camera: &CameraRig);
}

/// Advance one tick and ease the chase camera along.
///
/// The camera also follows on the tick that ends the run, so the crash
/// frame is framed like every frame before it.
pub fn step_session(session: &mut GameSession, camera: &mut CameraRig, input: &TickInput) {
    let was_playing = session.is_playing();
    tick(session, input);
    if was_playing {
        camera.follow(&session.player);
    }
}

/// Apply pending spawn/despawn events to the scene.
///
/// Returns every drained event so the caller can react to the rest
/// (game over, restart). An entity spawned and culled between two syncs
/// is skipped.
pub fn sync_scene<H: SceneHost + ?Sized>(
    host: &mut H,
    session: &mut GameSession,
) -> Vec<GameEvent> {
    let events = session.drain_events();
    for event in &events {
        match event {
            GameEvent::EntitySpawned(id) => {
                if let Some(entity) = session.store.get(*id) {
                    host.add_entity(entity);
                }
            }
            GameEvent::EntityDespawned(id) => host.remove_entity(*id),
            _ => {}
        }
    }
    events
}

/// Scene that only tracks what would be on screen.
/// Used by the native runner and in tests.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    live: HashMap<EntityId, EntityKind>,
    pub frames: u64,
    pub hud: Option<HudView>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.live.values().filter(|k| **k == kind).count()
    }
}

impl SceneHost for HeadlessScene {
    fn add_entity(&mut self, entity: &Entity) {
        self.live.insert(entity.id, entity.kind);
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.live.remove(&id);
    }

    fn set_hud(&mut self, hud: &HudView) {
        self.hud = Some(hud.clone());
    }

    fn render(&mut self, _session: &GameSession, _camera: &CameraRig) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    #[test]
    fn test_scene_mirrors_store() {
        let mut session = GameSession::new(10, Tuning::default());
        let mut scene = HeadlessScene::new();
        sync_scene(&mut scene, &mut session);
        assert_eq!(scene.live_count(), session.store.len());

        let boost = TickInput {
            boost: true,
            ..Default::default()
        };
        for _ in 0..500 {
            tick(&mut session, &boost);
            sync_scene(&mut scene, &mut session);
            if !session.is_playing() {
                break;
            }
        }
        assert_eq!(scene.live_count(), session.store.len());
        assert!(session.store.iter().all(|e| scene.contains(e.id)));
    }

    #[test]
    fn test_camera_follows_on_crash_tick() {
        let mut session = GameSession::new(10, Tuning::default());
        session.store.push_rock_at(session.player.pos, 3.0);
        let mut camera = CameraRig::default();

        step_session(&mut session, &mut camera, &TickInput::default());
        assert!(!session.is_playing());
        // 10% of the way from z = 30 toward 29.7
        assert!((camera.position.z - 29.97).abs() < 1e-4);
        assert_eq!(camera.target, session.player.pos);

        let frozen = camera.clone();
        step_session(&mut session, &mut camera, &TickInput::default());
        assert_eq!(camera, frozen);
    }

    #[test]
    fn test_late_sync_skips_already_culled() {
        let mut session = GameSession::new(10, Tuning::default());
        // First tick culls the tail of the opening span before the host syncs
        tick(&mut session, &TickInput::default());
        let mut scene = HeadlessScene::new();
        sync_scene(&mut scene, &mut session);
        assert_eq!(scene.live_count(), session.store.len());
    }

    #[test]
    fn test_restart_replaces_scene_contents() {
        let mut session = GameSession::new(10, Tuning::default());
        let mut scene = HeadlessScene::new();
        sync_scene(&mut scene, &mut session);
        let old: Vec<_> = session.store.iter().map(|e| e.id).collect();

        session.restart(11);
        let events = sync_scene(&mut scene, &mut session);
        assert!(events.contains(&GameEvent::Restarted));
        assert!(old.iter().all(|id| !scene.contains(*id)));
        assert_eq!(scene.live_count(), session.store.len());
        assert_eq!(scene.count_kind(EntityKind::WallLeft), 51);
    }
}
