//! Game state and core simulation types
//!
//! `GameSession` is the single owner of everything a tick touches.

use glam::{EulerRot, Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::effects::{Bubble, ExplosionBurst};
use super::player::Submarine;
use super::store::EntityStore;
use super::world::fill_initial;
use crate::consts::BUBBLE_COUNT;
use crate::error::TuningError;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Submarine is flying, world is streaming
    Playing,
    /// Run ended on a collision; waiting for restart
    GameOver,
}

/// Stable handle for a canyon entity, unique for the life of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What a canyon entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    WallLeft,
    WallRight,
    Rock,
}

impl EntityKind {
    pub fn is_wall(self) -> bool {
        matches!(self, EntityKind::WallLeft | EntityKind::WallRight)
    }
}

/// A freshly generated entity, not yet in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDesc {
    pub kind: EntityKind,
    pub pos: Vec3,
    /// Half the bounding box size on each axis
    pub half_extents: Vec3,
    /// Euler angles (radians), cosmetic only
    pub rotation: Vec3,
    /// Material brightness for the renderer
    pub shade: f32,
}

/// A wall segment or rock living in the canyon.
///
/// `half_extents` describe the unrotated box; `bounds` applies the rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec3,
    pub half_extents: Vec3,
    pub rotation: Vec3,
    pub shade: f32,
}

impl Entity {
    pub fn from_desc(id: EntityId, desc: EntityDesc) -> Self {
        Self {
            id,
            kind: desc.kind,
            pos: desc.pos,
            half_extents: desc.half_extents,
            rotation: desc.rotation,
            shade: desc.shade,
        }
    }

    /// Position along the run; used for streaming and culling
    #[inline]
    pub fn z(&self) -> f32 {
        self.pos.z
    }

    /// Orientation as a quaternion (XYZ Euler order)
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// World-space bounding box of the rotated entity
    pub fn bounds(&self) -> Aabb {
        if self.rotation == Vec3::ZERO {
            return Aabb::from_center_half_extents(self.pos, self.half_extents);
        }
        Aabb::from_center_half_extents(Vec3::ZERO, self.half_extents)
            .transformed(self.orientation(), self.pos)
    }
}

/// Things the host needs to react to after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Entity entered the store; add it to the scene
    EntitySpawned(EntityId),
    /// Entity left the store; remove it from the scene
    EntityDespawned(EntityId),
    /// Submarine hit this entity
    Collided { entity: EntityId },
    /// Run ended with this displayed score
    GameOver { final_score: u64 },
    /// Session was reset to a fresh run
    Restarted,
}

/// Complete session state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Accumulated score; displayed floored
    pub score: f32,
    /// Always `1 + score / points_per_difficulty` while playing
    pub difficulty: f32,
    /// Playing ticks since the last (re)start
    pub time_ticks: u64,
    pub player: Submarine,
    pub store: EntityStore,
    /// Ambient bubbles (not gameplay-affecting)
    pub bubbles: Vec<Bubble>,
    /// Timed explosion effects, advanced every tick in every phase
    pub bursts: Vec<ExplosionBurst>,
    /// Pending host notifications, drained by the scene sync
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// Create a session and fill the initial stretch of canyon.
    ///
    /// `tuning` must already be validated (`Tuning::from_json` and
    /// `Tuning::default` both are). Use `try_new` for unchecked values.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        debug_assert!(tuning.validate().is_ok(), "unvalidated tuning");
        let mut session = Self {
            seed,
            tuning,
            phase: GamePhase::Playing,
            score: 0.0,
            difficulty: 1.0,
            time_ticks: 0,
            player: Submarine::default(),
            store: EntityStore::new(),
            bubbles: Vec::with_capacity(BUBBLE_COUNT),
            bursts: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        session.populate();
        log::info!(
            "Session started (seed {}, {} entities)",
            seed,
            session.store.len()
        );
        session
    }

    /// Validate `tuning`, then create the session
    pub fn try_new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::new(seed, tuning))
    }

    /// Reset to a fresh run with a new seed.
    ///
    /// Every existing entity is reported as despawned before the new canyon
    /// is reported as spawned.
    pub fn restart(&mut self, seed: u64) {
        for id in self.store.clear() {
            self.events.push(GameEvent::EntityDespawned(id));
        }
        self.events.push(GameEvent::Restarted);

        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.phase = GamePhase::Playing;
        self.score = 0.0;
        self.difficulty = 1.0;
        self.time_ticks = 0;
        self.player = Submarine::default();
        self.bubbles.clear();
        self.populate();

        log::info!("Session restarted (seed {})", seed);
    }

    /// Score as shown on the HUD
    #[inline]
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// True while the host should keep scheduling frames
    pub fn is_animating(&self) -> bool {
        self.is_playing() || !self.bursts.is_empty()
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Initial canyon plus bubbles spread over the visible span
    fn populate(&mut self) {
        for id in fill_initial(&mut self.store, &mut self.rng, &self.tuning.world) {
            self.events.push(GameEvent::EntitySpawned(id));
        }
        let player_z = self.player.pos.z;
        for _ in 0..BUBBLE_COUNT {
            self.bubbles.push(Bubble::spawn(&mut self.rng, player_z, true));
        }
    }
}
