//! Chase camera
//!
//! Trails the submarine from above and behind, easing toward its offset
//! so banking and boosts feel smooth.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::Submarine;

/// Resting camera position relative to the run origin
const CAMERA_HOME: Vec3 = Vec3::new(0.0, 15.0, 30.0);
/// Fraction of the remaining distance covered per tick
const FOLLOW_RATE: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: CAMERA_HOME,
            target: Vec3::from_array(crate::consts::PLAYER_START),
        }
    }
}

impl CameraRig {
    /// Ease toward the chase offset behind the sub
    pub fn follow(&mut self, sub: &Submarine) {
        let goal = Vec3::new(CAMERA_HOME.x, CAMERA_HOME.y, sub.pos.z + CAMERA_HOME.z);
        self.position = self.position.lerp(goal, FOLLOW_RATE);
        self.target = sub.pos;
    }

    /// Snap back to the starting view
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_eases_toward_offset() {
        let mut cam = CameraRig::default();
        let mut sub = Submarine::default();
        sub.pos.z = -100.0;
        cam.follow(&sub);
        // 10% of the way from 30 to -70
        assert!((cam.position.z - 20.0).abs() < 1e-4);
        assert_eq!(cam.position.y, 15.0);
        assert_eq!(cam.target, sub.pos);

        for _ in 0..200 {
            cam.follow(&sub);
        }
        assert!((cam.position.z + 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_reset() {
        let mut cam = CameraRig::default();
        let mut sub = Submarine::default();
        sub.pos.z = -50.0;
        cam.follow(&sub);
        cam.reset();
        assert_eq!(cam, CameraRig::default());
    }
}
