//! Submarine kinematics
//!
//! Simple per-tick Euler integration with damping and hard clamps.
//! Hitting a position bound clamps the position but leaves velocity alone,
//! so holding a direction against a bound keeps the sub pressed there.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::tick::TickInput;
use crate::consts::{HULL_MAX, HULL_MIN, PLAYER_START, PLAYER_START_VELOCITY};
use crate::tuning::PlayerTuning;

/// The player's submarine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submarine {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Euler angles (x = pitch, z = roll), rederived from velocity every update
    pub rotation: Vec3,
    /// Hidden once the sub is destroyed
    pub visible: bool,
}

impl Default for Submarine {
    fn default() -> Self {
        Self {
            pos: Vec3::from_array(PLAYER_START),
            vel: Vec3::from_array(PLAYER_START_VELOCITY),
            rotation: Vec3::ZERO,
            visible: true,
        }
    }
}

impl Submarine {
    /// Advance one tick
    pub fn update(&mut self, input: &TickInput, difficulty: f32, tuning: &PlayerTuning) {
        let accel = tuning.acceleration;

        if input.left {
            self.vel.x -= accel;
        }
        if input.right {
            self.vel.x += accel;
        }
        if input.up {
            self.vel.y += accel;
        }
        if input.down {
            self.vel.y -= accel;
        }
        if input.boost {
            self.vel.z -= accel * tuning.boost_multiplier;
        }

        self.vel.x *= tuning.damping;
        self.vel.y *= tuning.damping;

        // Forced forward drift, with a speed floor that rises with difficulty
        let floor = -tuning.base_speed_floor - difficulty * tuning.speed_floor_per_difficulty;
        self.vel.z = (self.vel.z - tuning.forward_drift * difficulty).min(floor);

        let lateral = tuning.max_lateral_speed;
        self.vel.x = self.vel.x.clamp(-lateral, lateral);
        self.vel.y = self.vel.y.clamp(-lateral, lateral);
        self.vel.z = self
            .vel
            .z
            .clamp(-tuning.max_forward_speed, -tuning.min_forward_speed);

        self.pos += self.vel;

        // Banking is cosmetic, derived from velocity
        self.rotation = Vec3::new(
            self.vel.y * tuning.bank_factor,
            0.0,
            -self.vel.x * tuning.bank_factor,
        );

        self.pos.x = self.pos.x.clamp(-tuning.bound_x, tuning.bound_x);
        self.pos.y = self.pos.y.clamp(tuning.bound_y_min, tuning.bound_y_max);
    }

    /// Orientation as a quaternion (XYZ Euler order)
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// World-space bounding box of the hull at its current transform
    pub fn bounds(&self) -> Aabb {
        let local = Aabb::new(Vec3::from_array(HULL_MIN), Vec3::from_array(HULL_MAX));
        local.transformed(self.orientation(), self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tuning() -> PlayerTuning {
        PlayerTuning::default()
    }

    #[test]
    fn test_idle_tick_drifts_forward() {
        let mut sub = Submarine::default();
        sub.update(&TickInput::default(), 1.0, &tuning());
        // min(-0.2 - 0.0001, -0.3) = -0.3
        assert!((sub.vel.z + 0.3).abs() < 1e-6);
        assert!((sub.pos.z + 0.3).abs() < 1e-6);
        assert_eq!(sub.pos.x, 0.0);
        assert_eq!(sub.pos.y, 10.0);
    }

    #[test]
    fn test_lateral_input_is_damped() {
        let mut sub = Submarine::default();
        let input = TickInput {
            right: true,
            up: true,
            ..Default::default()
        };
        sub.update(&input, 1.0, &tuning());
        assert!((sub.vel.x - 0.0095).abs() < 1e-7);
        assert!((sub.vel.y - 0.0095).abs() < 1e-7);
        // Banking follows velocity
        assert!((sub.rotation.z + 0.0095 * 0.5).abs() < 1e-7);
        assert!((sub.rotation.x - 0.0095 * 0.5).abs() < 1e-7);

        // Release: exponential decay toward rest
        let before = sub.vel.x;
        sub.update(&TickInput::default(), 1.0, &tuning());
        assert!((sub.vel.x - before * 0.95).abs() < 1e-7);
    }

    #[test]
    fn test_boost_speeds_up() {
        let mut plain = Submarine::default();
        let mut boosted = Submarine::default();
        let boost = TickInput {
            boost: true,
            ..Default::default()
        };
        for _ in 0..100 {
            plain.update(&TickInput::default(), 1.0, &tuning());
            boosted.update(&boost, 1.0, &tuning());
        }
        assert!(boosted.vel.z < plain.vel.z);
        assert!(boosted.pos.z < plain.pos.z);
    }

    #[test]
    fn test_forward_speed_capped() {
        let mut sub = Submarine::default();
        let boost = TickInput {
            boost: true,
            ..Default::default()
        };
        for _ in 0..1000 {
            sub.update(&boost, 50.0, &tuning());
        }
        assert_eq!(sub.vel.z, -4.0);
    }

    #[test]
    fn test_speed_floor_scales_with_difficulty() {
        let mut sub = Submarine::default();
        sub.update(&TickInput::default(), 3.0, &tuning());
        assert!(sub.vel.z <= -0.5 + 1e-6);
    }

    #[test]
    fn test_bound_clamps_position_not_velocity() {
        let mut sub = Submarine::default();
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            sub.update(&input, 1.0, &tuning());
        }
        assert_eq!(sub.pos.x, -25.0);
        // Velocity keeps pushing into the bound
        assert!(sub.vel.x < -0.15);
    }

    #[test]
    fn test_bounds_cover_hull_when_level() {
        let sub = Submarine::default();
        let b = sub.bounds();
        assert!((b.min - (sub.pos + Vec3::from_array(HULL_MIN))).length() < 1e-4);
        assert!((b.max - (sub.pos + Vec3::from_array(HULL_MAX))).length() < 1e-4);
    }

    #[test]
    fn test_banked_bounds_grow() {
        let mut sub = Submarine::default();
        let level = sub.bounds();
        sub.rotation = Vec3::new(0.3, 0.0, -0.4);
        let banked = sub.bounds();
        assert!(banked.max.y - banked.min.y > level.max.y - level.min.y);
    }

    proptest! {
        #[test]
        fn prop_position_and_speed_stay_in_bounds(
            moves in proptest::collection::vec(any::<(bool, bool, bool, bool, bool)>(), 1..400),
            difficulty in 1.0f32..20.0,
        ) {
            let mut sub = Submarine::default();
            for (left, right, up, down, boost) in moves {
                let input = TickInput {
                    left,
                    right,
                    up,
                    down,
                    boost,
                };
                sub.update(&input, difficulty, &tuning());
                prop_assert!(sub.pos.x >= -25.0 && sub.pos.x <= 25.0);
                prop_assert!(sub.pos.y >= 2.0 && sub.pos.y <= 30.0);
                prop_assert!(sub.vel.z >= -4.0 && sub.vel.z <= -0.1);
                prop_assert!(sub.vel.x.abs() <= 1.0 && sub.vel.y.abs() <= 1.0);
            }
        }

        #[test]
        fn prop_forward_velocity_never_slows_without_input(
            ticks in 1usize..500,
            difficulty in 1.0f32..10.0,
        ) {
            let mut sub = Submarine::default();
            let mut last = sub.vel.z;
            for _ in 0..ticks {
                sub.update(&TickInput::default(), difficulty, &tuning());
                prop_assert!(sub.vel.z <= last);
                last = sub.vel.z;
            }
        }
    }
}
