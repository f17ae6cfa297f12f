//! HUD view-model
//!
//! What the score display and game-over panel should show. The host page
//! applies it to the DOM; nothing here touches the browser.

use crate::sim::{GamePhase, GameSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    /// Floored score for the live counter
    pub score_text: String,
    /// Whether the game-over panel is visible
    pub game_over_visible: bool,
    /// Final floored score, set only once the run has ended
    pub final_score: Option<u64>,
}

impl HudView {
    pub fn from_session(session: &GameSession) -> Self {
        let score = session.display_score();
        let over = session.phase == GamePhase::GameOver;
        Self {
            score_text: score.to_string(),
            game_over_visible: over,
            final_score: over.then_some(score),
        }
    }
}
