use game_persistence::StoreError;
use game_types::{GameError, GameId, PlayerId, Role};
use thiserror::Error;
use warp::http::StatusCode;

use crate::ai::GenerationError;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("AI failed to move: {0}")]
    Generation(#[from] GenerationError),
    #[error("game {0} not found")]
    NotFound(GameId),
    #[error("player {player_id} holds no {role} seat in this game")]
    NotSeated { player_id: PlayerId, role: Role },
    #[error("game was changed concurrently {attempts} times in a row, try again")]
    StoreConflict { attempts: u32 },
    #[error("storage failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ManagerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ManagerError::NotFound(id),
            other => ManagerError::Store(other),
        }
    }
}

impl ManagerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ManagerError::Game(_) => StatusCode::BAD_REQUEST,
            ManagerError::NotSeated { .. } => StatusCode::FORBIDDEN,
            ManagerError::NotFound(_) => StatusCode::NOT_FOUND,
            ManagerError::StoreConflict { .. } => StatusCode::CONFLICT,
            ManagerError::Generation(_) => StatusCode::SERVICE_UNAVAILABLE,
            ManagerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ManagerError::Generation(_) | ManagerError::StoreConflict { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(
            ManagerError::from(StoreError::NotFound(id)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ManagerError::from(GameError::NoActiveClue).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ManagerError::NotSeated {
                player_id: id,
                role: Role::Operative
            }
            .status(),
            StatusCode::FORBIDDEN
        );

        let conflict = ManagerError::StoreConflict { attempts: 3 };
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert!(conflict.is_retryable());

        let timeout = ManagerError::from(GenerationError::Timeout {
            model_id: "gpt-4o".to_string(),
            seconds: 30,
        });
        assert_eq!(timeout.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(timeout.is_retryable());
    }
}
