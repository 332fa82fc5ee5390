use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::game::{GameView, TickOutcome};
use crate::player::SeatAssignments;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PlayerAction {
    GiveClue { word: String, count: u32 },
    GuessCard { index: usize },
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateGameRequest {
    pub seats: SeatAssignments,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TickResponse {
    /// Every transition applied while handling the request, AI moves included
    pub outcomes: Vec<TickOutcome>,
    /// Set when an AI seat failed to move; the caller may tick again
    pub ai_error: Option<String>,
    pub game: GameView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ModelProvider {
    OpenAi,
    Anthropic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelOption {
    pub id: String,
    pub name: String,
    pub provider: ModelProvider,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    pub retryable: bool,
}
