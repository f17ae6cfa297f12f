//! Error types
//!
//! The simulation itself never fails; these cover startup and configuration.

use thiserror::Error;

/// Reasons the game cannot start.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The 3D rendering collaborator was not loaded by the host page
    #[error("rendering engine is unavailable (is three.js loaded?)")]
    RendererUnavailable,
    /// A DOM element the HUD needs is missing
    #[error("missing page element #{0}")]
    MissingElement(&'static str),
    /// Browser globals (window/document) are not reachable
    #[error("no browser window or document")]
    NoWindow,
}

/// Invalid tuning data.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning file could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("tuning JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
