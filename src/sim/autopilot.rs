//! Demo autopilot
//!
//! Steers toward the canyon centreline and dodges the nearest rock ahead.
//! Used by the native headless runner and the in-browser idle mode.

use glam::Vec3;

use super::state::GameSession;
use super::tick::TickInput;

/// How far ahead (in -z) rocks are considered
const LOOKAHEAD: f32 = 60.0;
/// Clearance wanted around a rock
const DODGE_MARGIN: f32 = 9.0;
/// Cruising depth
const CRUISE_Y: f32 = 15.0;

/// Pick the controls for this tick
pub fn autopilot_input(session: &GameSession) -> TickInput {
    let sub = &session.player;
    let mut target = Vec3::new(0.0, CRUISE_Y, sub.pos.z);

    let threat = session
        .store
        .rocks()
        .iter()
        .filter(|r| r.z() < sub.pos.z && r.z() > sub.pos.z - LOOKAHEAD)
        .filter(|r| (r.pos.x - sub.pos.x).abs() < DODGE_MARGIN + r.half_extents.x)
        .min_by(|a, b| b.z().total_cmp(&a.z()));

    if let Some(rock) = threat {
        // Pass on whichever side has more room
        let side = if rock.pos.x > 0.0 { -1.0 } else { 1.0 };
        target.x = rock.pos.x + side * (DODGE_MARGIN + rock.half_extents.x);
    }

    // Lead by a few ticks of velocity so damping doesn't cause overshoot
    let predicted = sub.pos + sub.vel * 10.0;
    TickInput {
        left: predicted.x > target.x + 0.5,
        right: predicted.x < target.x - 0.5,
        up: predicted.y < target.y - 0.5,
        down: predicted.y > target.y + 0.5,
        boost: threat.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick;
    use crate::tuning::Tuning;

    fn session() -> GameSession {
        let mut tuning = Tuning::default();
        tuning.world.rock_chance = 0.0;
        GameSession::new(4, tuning)
    }

    #[test]
    fn test_steers_back_to_centre() {
        let mut s = session();
        s.player.pos.x = 12.0;
        s.player.pos.y = 25.0;
        let input = autopilot_input(&s);
        assert!(input.left && !input.right);
        assert!(input.down && !input.up);
        assert!(input.boost);
    }

    #[test]
    fn test_dodges_rock_ahead() {
        let mut s = session();
        s.player.pos = Vec3::new(0.0, 15.0, 0.0);
        s.store.push_rock_at(Vec3::new(2.0, 15.0, -30.0), 2.0);
        let input = autopilot_input(&s);
        // Rock sits right of centre, so pass left
        assert!(input.left);
        assert!(!input.boost);
    }

    #[test]
    fn test_survives_calm_canyon() {
        let mut s = session();
        for _ in 0..3000 {
            let input = autopilot_input(&s);
            tick(&mut s, &input);
        }
        assert!(s.is_playing());
    }
}
