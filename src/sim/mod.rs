//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (insertion order, walls before rocks)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod player;
pub mod state;
pub mod store;
pub mod streaming;
pub mod tick;
pub mod world;

pub use autopilot::autopilot_input;
pub use collision::{Aabb, detect_collision};
pub use effects::{Bubble, BurstParticle, ExplosionBurst};
pub use player::Submarine;
pub use state::{Entity, EntityDesc, EntityId, EntityKind, GameEvent, GamePhase, GameSession};
pub use store::EntityStore;
pub use streaming::{StreamReport, stream_world};
pub use tick::{TickInput, tick};
pub use world::{ROCK_BOX_RATIO, Segment, fill_initial, generate_segment};
