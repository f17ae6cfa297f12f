//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key identifiers to held-control state)

pub mod input;

pub use input::KeyState;
