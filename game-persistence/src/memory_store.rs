use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use game_core::Game;
use game_types::{GameId, GameSummary, Hint, Move, PlayerId};
use tracing::debug;

use crate::store::{GameStore, StoreError};

/// Process-local store used for tests and `DATABASE_URL=memory`
#[derive(Default)]
pub struct InMemoryGameStore {
    games: DashMap<GameId, Game>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn create_game(&self, game: &Game) -> Result<GameId, StoreError> {
        match self.games.entry(game.id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(game.id)),
            Entry::Vacant(slot) => {
                slot.insert(game.clone());
                Ok(game.id)
            }
        }
    }

    async fn load_game(&self, id: GameId) -> Result<Game, StoreError> {
        self.games
            .get(&id)
            .map(|game| game.clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn save_game(&self, game: &Game) -> Result<u64, StoreError> {
        let mut stored = self
            .games
            .get_mut(&game.id)
            .ok_or(StoreError::NotFound(game.id))?;

        if stored.version != game.version {
            return Err(StoreError::Conflict {
                expected: game.version,
                actual: stored.version,
            });
        }

        let mut next = game.clone();
        next.version = game.version + 1;
        debug!(game_id = %game.id, version = next.version, "Saved game in memory");
        *stored = next;

        Ok(game.version + 1)
    }

    async fn moves(&self, id: GameId) -> Result<Vec<Move>, StoreError> {
        self.load_game(id).await.map(|game| game.moves)
    }

    async fn hints(&self, id: GameId) -> Result<Vec<Hint>, StoreError> {
        self.load_game(id).await.map(|game| game.hints)
    }

    async fn list_games_for_player(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<GameSummary>, StoreError> {
        let mut summaries: Vec<GameSummary> = self
            .games
            .iter()
            .filter(|entry| !entry.seats.roles_of(player_id).is_empty())
            .map(|entry| entry.summary())
            .collect();

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}
