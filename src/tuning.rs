//! Data-driven game balance
//!
//! Every gameplay constant lives here so a page can override them with a
//! JSON blob. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Submarine handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Per-tick acceleration while a direction key is held
    pub acceleration: f32,
    /// Forward acceleration multiplier while boosting
    pub boost_multiplier: f32,
    /// Lateral/vertical velocity decay per tick
    pub damping: f32,
    /// Cap on |vx| and |vy|
    pub max_lateral_speed: f32,
    /// Slowest allowed forward speed (vz never rises above -min)
    pub min_forward_speed: f32,
    /// Fastest allowed forward speed (vz never drops below -max)
    pub max_forward_speed: f32,
    /// Forced forward acceleration per tick, scaled by difficulty
    pub forward_drift: f32,
    /// Forward speed floor at difficulty 0
    pub base_speed_floor: f32,
    /// Forward speed floor growth per point of difficulty
    pub speed_floor_per_difficulty: f32,
    /// Visual banking per unit of velocity
    pub bank_factor: f32,
    /// Lateral position limit (x in [-bound_x, bound_x])
    pub bound_x: f32,
    pub bound_y_min: f32,
    pub bound_y_max: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.01,
            boost_multiplier: 2.0,
            damping: 0.95,
            max_lateral_speed: 1.0,
            min_forward_speed: 0.1,
            max_forward_speed: 4.0,
            forward_drift: 0.0001,
            base_speed_floor: 0.2,
            speed_floor_per_difficulty: 0.1,
            bank_factor: 0.5,
            bound_x: 25.0,
            bound_y_min: 2.0,
            bound_y_max: 30.0,
        }
    }
}

/// Canyon generation and streaming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Distance between wall segments along z
    pub segment_spacing: f32,
    /// z range filled at session start (inclusive)
    pub initial_z_min: f32,
    pub initial_z_max: f32,
    /// Rocks in the initial fill only appear past this z
    pub initial_rock_min_z: f32,
    /// Generate more once the frontier is closer than this
    pub generate_ahead: f32,
    /// Length of canyon added per generation batch
    pub generate_span: f32,
    /// Entities further than this behind the player are dropped
    pub cull_distance: f32,
    /// Chance of a rock per segment
    pub rock_chance: f64,
    /// Gap between the canyon edge and wall centre
    pub wall_offset: f32,
    /// Only entities this close in z are collision-tested
    pub collision_window: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            segment_spacing: 8.0,
            initial_z_min: -200.0,
            initial_z_max: 200.0,
            initial_rock_min_z: -50.0,
            generate_ahead: 150.0,
            generate_span: 80.0,
            cull_distance: 150.0,
            rock_chance: 0.1,
            wall_offset: 5.0,
            collision_window: 15.0,
        }
    }
}

/// Score and difficulty curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    /// Points per unit of forward distance travelled
    pub points_per_unit: f32,
    /// Score needed to raise difficulty by one
    pub points_per_difficulty: f32,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            points_per_unit: 0.5,
            points_per_difficulty: 500.0,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub world: WorldTuning,
    pub score: ScoreTuning,
}

impl Tuning {
    /// Parse and validate a tuning blob
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values that would break the loop's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.player;
        let w = &self.world;

        check(
            (0.0..=1.0).contains(&p.damping),
            "player.damping",
            "must be within 0..=1",
        )?;
        check(
            p.max_lateral_speed > 0.0,
            "player.max_lateral_speed",
            "must be positive",
        )?;
        check(
            p.min_forward_speed > 0.0,
            "player.min_forward_speed",
            "must be positive",
        )?;
        check(
            p.max_forward_speed >= p.min_forward_speed,
            "player.max_forward_speed",
            "must be at least min_forward_speed",
        )?;
        check(p.bound_x > 0.0, "player.bound_x", "must be positive")?;
        check(
            p.bound_y_max > p.bound_y_min,
            "player.bound_y_max",
            "must exceed bound_y_min",
        )?;

        check(w.segment_spacing > 0.0, "world.segment_spacing", "must be positive")?;
        check(
            w.initial_z_max >= w.initial_z_min,
            "world.initial_z_max",
            "must be at least initial_z_min",
        )?;
        check(
            w.generate_span >= w.segment_spacing,
            "world.generate_span",
            "must cover at least one segment",
        )?;
        check(w.cull_distance > 0.0, "world.cull_distance", "must be positive")?;
        check(
            (0.0..=1.0).contains(&w.rock_chance),
            "world.rock_chance",
            "must be a probability",
        )?;
        check(
            w.collision_window > 0.0,
            "world.collision_window",
            "must be positive",
        )?;

        check(
            self.score.points_per_difficulty > 0.0,
            "score.points_per_difficulty",
            "must be positive",
        )?;
        Ok(())
    }
}

fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), TuningError> {
    if ok {
        Ok(())
    } else {
        Err(TuningError::Invalid { field, reason })
    }
}
