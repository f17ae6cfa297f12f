//! Per-frame simulation tick
//!
//! Core game loop that advances the session deterministically.

use super::collision::detect_collision;
use super::effects::{ExplosionBurst, step_bursts};
use super::state::{GameEvent, GamePhase, GameSession};
use super::streaming::stream_world;

/// Held controls for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Extra forward thrust
    pub boost: bool,
}

/// Advance the session by one tick.
///
/// Explosion bursts advance in every phase. Everything else only runs while
/// playing, in a fixed order: player, bubbles, score, difficulty, streaming,
/// collision.
pub fn tick(session: &mut GameSession, input: &TickInput) {
    step_bursts(&mut session.bursts);

    if session.phase != GamePhase::Playing {
        return;
    }

    session.time_ticks += 1;

    session
        .player
        .update(input, session.difficulty, &session.tuning.player);

    let player_z = session.player.pos.z;
    for bubble in &mut session.bubbles {
        bubble.update(&mut session.rng, player_z);
    }

    // Score tracks distance covered
    session.score -= session.player.vel.z * session.tuning.score.points_per_unit;
    session.difficulty = 1.0 + session.score / session.tuning.score.points_per_difficulty;

    let report = stream_world(
        &mut session.store,
        player_z,
        &mut session.rng,
        &session.tuning.world,
    );
    session
        .events
        .extend(report.spawned.into_iter().map(GameEvent::EntitySpawned));
    session
        .events
        .extend(report.culled.into_iter().map(GameEvent::EntityDespawned));

    if let Some(hit) = detect_collision(
        &session.player,
        &session.store,
        session.tuning.world.collision_window,
    ) {
        end_run(session, hit);
    }
}

/// Playing -> GameOver
fn end_run(session: &mut GameSession, hit: super::state::EntityId) {
    session.phase = GamePhase::GameOver;
    session.player.visible = false;

    let mut burst = ExplosionBurst::new(session.player.pos, &mut session.rng);
    // First frame of the blast shows on the crash tick
    burst.step();
    session.bursts.push(burst);

    let final_score = session.display_score();
    session.events.push(GameEvent::Collided { entity: hit });
    session.events.push(GameEvent::GameOver { final_score });

    log::info!(
        "Game over after {} ticks: hit {:?}, score {}",
        session.time_ticks,
        hit,
        final_score
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EntityKind;
    use crate::tuning::Tuning;
    use glam::Vec3;

    /// A session with no rocks, so only walls can end the run
    fn calm_session(seed: u64) -> GameSession {
        let mut tuning = Tuning::default();
        tuning.world.rock_chance = 0.0;
        GameSession::new(seed, tuning)
    }

    #[test]
    fn test_difficulty_follows_score() {
        let mut session = calm_session(1);
        for _ in 0..300 {
            tick(&mut session, &TickInput::default());
            assert_eq!(session.phase, GamePhase::Playing);
            let expected = 1.0 + session.score / 500.0;
            assert!((session.difficulty - expected).abs() < 1e-6);
        }
        assert!(session.score > 0.0);
    }

    #[test]
    fn test_difficulty_two_at_score_five_hundred() {
        let mut session = calm_session(1);
        session.score = 500.0 - 0.15;
        tick(&mut session, &TickInput::default());
        // One tick at vz = -0.3 adds 0.15
        assert!((session.score - 500.0).abs() < 1e-3);
        assert!((session.difficulty - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_score_rises_while_boosting_then_crash() {
        let mut session = calm_session(21);
        let boost = TickInput {
            boost: true,
            ..Default::default()
        };

        let mut last = session.score;
        for _ in 0..120 {
            tick(&mut session, &boost);
            assert!(session.score > last);
            last = session.score;
        }
        assert!(session.is_playing());

        // Drop a rock right on the sub's next position
        let next = session.player.pos + session.player.vel;
        let rock = session.store.push_rock_at(next, 3.0);
        session.drain_events();

        tick(&mut session, &boost);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(!session.player.visible);
        assert_eq!(session.bursts.len(), 1);

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::Collided { entity: rock }));
        let final_score = session.score.floor() as u64;
        assert!(events.contains(&GameEvent::GameOver { final_score }));
    }

    #[test]
    fn test_game_over_freezes_session() {
        let mut session = calm_session(3);
        session.store.push_rock_at(session.player.pos, 3.0);
        tick(&mut session, &TickInput::default());
        assert_eq!(session.phase, GamePhase::GameOver);

        let score = session.score;
        let pos = session.player.pos;
        let ticks = session.time_ticks;
        for _ in 0..10 {
            let boost = TickInput {
                boost: true,
                ..Default::default()
            };
            tick(&mut session, &boost);
        }
        assert_eq!(session.score, score);
        assert_eq!(session.player.pos, pos);
        assert_eq!(session.time_ticks, ticks);
        // The blast keeps playing out
        assert!(session.is_animating());
        for _ in 0..60 {
            tick(&mut session, &TickInput::default());
        }
        assert!(session.bursts.is_empty());
        assert!(!session.is_animating());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = calm_session(5);
        session.store.push_rock_at(session.player.pos, 3.0);
        tick(&mut session, &TickInput::default());
        assert_eq!(session.phase, GamePhase::GameOver);

        session.restart(6);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.score, 0.0);
        assert_eq!(session.difficulty, 1.0);
        assert_eq!(session.player.pos, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(session.player.vel, Vec3::new(0.0, 0.0, -0.2));
        assert!(session.player.visible);
        assert_eq!(session.store.frontier_z(), Some(-200.0));
        assert_eq!(session.store.walls().len(), 102);
        assert!(session.bubbles.iter().all(|b| b.pos.z >= -100.0 && b.pos.z < 100.0));

        tick(&mut session, &TickInput::default());
        assert!(session.is_playing());
    }

    #[test]
    fn test_frontier_never_gaps_during_play() {
        let mut session = calm_session(13);
        let boost = TickInput {
            boost: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut session, &boost);
            if !session.is_playing() {
                break;
            }
            let frontier = session.store.frontier_z().unwrap();
            assert!(frontier <= session.player.pos.z - 150.0);
        }
    }

    #[test]
    fn test_bound_keeps_hull_clear_of_walls() {
        let mut session = calm_session(2);
        // Pin the sub against the right bound
        session.player.pos.x = 25.0;
        let right_near = session
            .store
            .walls()
            .iter()
            .filter(|w| w.kind == EntityKind::WallRight)
            .any(|w| (w.z() - session.player.pos.z).abs() < 15.0);
        assert!(right_near);
        // Hull reaches x = 29.392; the nearest wall face is past 36
        tick(&mut session, &TickInput::default());
        assert!(session.is_playing());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameSession::new(99, Tuning::default());
        let mut b = GameSession::new(99, Tuning::default());
        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                boost: true,
                up: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for i in 0..600 {
            let input = inputs[i % inputs.len()];
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.player, b.player);
        assert_eq!(a.store.walls(), b.store.walls());
        assert_eq!(a.bubbles, b.bubbles);
    }
}
