use chrono::Utc;
use game_core::{Game, GameEvent, GameEventBus, Submission};
use game_persistence::GameStore;
use game_types::{GameId, TickOutcome};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::errors::ManagerError;

/// A tick that was applied and persisted
#[derive(Debug, Clone)]
pub struct Committed {
    pub game: Game,
    pub outcome: TickOutcome,
}

/// Load, tick, save. Lost races reload and tick again against the fresh state.
pub struct TurnCommitter {
    store: Arc<dyn GameStore>,
    events: Mutex<GameEventBus>,
    max_attempts: u32,
}

impl TurnCommitter {
    pub fn new(store: Arc<dyn GameStore>, events: GameEventBus, max_attempts: u32) -> Self {
        Self {
            store,
            events: Mutex::new(events),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    pub async fn commit(
        &self,
        game_id: GameId,
        submission: Option<Submission>,
    ) -> Result<Committed, ManagerError> {
        for attempt in 1..=self.max_attempts {
            let mut game = self.store.load_game(game_id).await?;
            let outcome = game.tick(submission.clone(), Utc::now())?;

            // Nothing changed, nothing to write
            if outcome.is_idle() {
                return Ok(Committed { game, outcome });
            }

            match self.store.save_game(&game).await {
                Ok(version) => {
                    game.version = version;
                    info!(%game_id, version, phase = %game.phase, "Committed tick");
                    if let Some(event) = GameEvent::from_outcome(game_id, &outcome) {
                        self.publish(event);
                    }
                    return Ok(Committed { game, outcome });
                }
                Err(e) if e.is_conflict() => {
                    warn!(%game_id, attempt, "Version conflict while saving, retrying: {}", e);
                }
                Err(e) => {
                    error!(%game_id, "Failed to save game: {}", e);
                    return Err(e.into());
                }
            }
        }

        Err(ManagerError::StoreConflict {
            attempts: self.max_attempts,
        })
    }

    pub fn publish(&self, event: GameEvent) {
        match self.events.lock() {
            Ok(mut bus) => bus.publish(event),
            Err(_) => warn!("Event bus lock poisoned, dropping {:?}", event),
        }
    }
}
