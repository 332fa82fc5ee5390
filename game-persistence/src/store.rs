use async_trait::async_trait;
use game_core::Game;
use game_types::{GameId, GameSummary, Hint, Move, PlayerId};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game {0} not found")]
    NotFound(GameId),
    #[error("version conflict: expected {expected}, found {actual}")]
    Conflict { expected: u64, actual: u64 },
    #[error("game {0} already exists")]
    AlreadyExists(GameId),
    #[error("stored game is unreadable: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Durable game storage.
///
/// `save_game` is a compare-and-swap on `game.version`: it succeeds only when the stored
/// version still equals the one the caller loaded, and it appends any moves and hints the
/// store has not seen yet as part of the same write. On success the new version is returned.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn create_game(&self, game: &Game) -> Result<GameId, StoreError>;

    async fn load_game(&self, id: GameId) -> Result<Game, StoreError>;

    async fn save_game(&self, game: &Game) -> Result<u64, StoreError>;

    async fn moves(&self, id: GameId) -> Result<Vec<Move>, StoreError>;

    async fn hints(&self, id: GameId) -> Result<Vec<Hint>, StoreError>;

    /// Newest first
    async fn list_games_for_player(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<GameSummary>, StoreError>;
}
