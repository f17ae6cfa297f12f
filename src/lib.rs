//! Abyss Runner - An endless submarine run through an undersea canyon
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, world streaming, collisions, game state)
//! - `scene`: Render collaborator seam (scene graph add/remove, per-frame render)
//! - `platform`: Browser/native platform abstraction (input mapping)
//! - `tuning`: Data-driven game balance
//! - `camera`, `ui`: Presentation state derived from the simulation

pub mod camera;
pub mod error;
pub mod platform;
pub mod scene;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use camera::CameraRig;
pub use error::{StartupError, TuningError};
pub use scene::{HeadlessScene, SceneHost, step_session, sync_scene};
pub use tuning::Tuning;
pub use ui::HudView;

/// Game configuration constants
pub mod consts {
    /// Submarine spawn position
    pub const PLAYER_START: [f32; 3] = [0.0, 10.0, 0.0];
    /// Initial velocity: forward only
    pub const PLAYER_START_VELOCITY: [f32; 3] = [0.0, 0.0, -0.2];

    /// Submarine hull bounding box in model space (min, max).
    /// x: dive plane tips, -y: belly rivets, +y: tower dome,
    /// -z: tilted ram tip, +z: the upright propeller blade.
    pub const HULL_MIN: [f32; 3] = [-4.392, -2.1, -12.655];
    pub const HULL_MAX: [f32; 3] = [4.392, 5.2, 11.5];

    /// Number of ambient bubbles
    pub const BUBBLE_COUNT: usize = 100;

    /// Explosion burst defaults
    pub const EXPLOSION_PARTICLES: usize = 50;
    pub const EXPLOSION_LIFESPAN: u32 = 60;
}

/// Canyon half-width at a given depth along the run.
///
/// Walls sit just outside this value, so the playable corridor breathes
/// between 30 and 50 units as the run goes on.
#[inline]
pub fn canyon_width(z: f32) -> f32 {
    40.0 + (z * 0.01).sin() * 10.0
}
