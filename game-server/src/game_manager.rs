use chrono::Utc;
use dashmap::DashMap;
use game_core::{
    Board, Game, GameEvent, GameEventBus, Submission, TracingEventHandler, WordBank,
};
use game_persistence::GameStore;
use game_types::{
    Actor, GameId, GamePhase, GameSummary, GameView, PlayerAction, PlayerId, Role,
    SeatAssignments, SeatOccupant, Team, TickOutcome, TickResponse,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ai::{AiOrchestrator, GuessProvider, HintProvider};
use crate::commit::TurnCommitter;
use crate::config::Config;
use crate::errors::ManagerError;

/// Entry point for every caller-facing game operation
pub struct GameManager {
    committer: Arc<TurnCommitter>,
    orchestrator: AiOrchestrator,
    word_bank: WordBank,
    turn_duration_seconds: u32,
    ai_seat_limit: u32,
    drive_locks: DashMap<GameId, Arc<Mutex<()>>>,
}

impl GameManager {
    pub fn new(
        config: &Config,
        store: Arc<dyn GameStore>,
        word_bank: WordBank,
        hints: Arc<dyn HintProvider>,
        guesses: Arc<dyn GuessProvider>,
    ) -> Self {
        Self::with_events(config, store, word_bank, hints, guesses, GameEventBus::new())
    }

    /// Like `new`, with extra handlers already registered on the bus
    pub fn with_events(
        config: &Config,
        store: Arc<dyn GameStore>,
        word_bank: WordBank,
        hints: Arc<dyn HintProvider>,
        guesses: Arc<dyn GuessProvider>,
        mut events: GameEventBus,
    ) -> Self {
        events.add_handler(Box::new(TracingEventHandler));
        let committer = Arc::new(TurnCommitter::new(
            store,
            events,
            config.max_commit_attempts,
        ));
        let orchestrator = AiOrchestrator::new(
            committer.clone(),
            hints,
            guesses,
            config.ai_provider_timeout,
            config.ai_guess_delay,
        );

        Self {
            committer,
            orchestrator,
            word_bank,
            turn_duration_seconds: config.turn_duration_seconds,
            ai_seat_limit: config.ai_seat_limit,
            drive_locks: DashMap::new(),
        }
    }

    fn store(&self) -> &Arc<dyn GameStore> {
        self.committer.store()
    }

    pub async fn create_game(&self, seats: SeatAssignments) -> Result<GameView, ManagerError> {
        let board = Board::generate(&self.word_bank, &mut rand::rng())?;
        let game = Game::new(
            Uuid::new_v4(),
            board,
            seats,
            self.turn_duration_seconds,
            Utc::now(),
        );

        self.store().create_game(&game).await?;
        info!(game_id = %game.id, "Created game");
        self.committer.publish(GameEvent::GameCreated {
            game_id: game.id,
            seats: game.seats.clone(),
        });

        Ok(game.view_for(None))
    }

    pub async fn get_view(
        &self,
        game_id: GameId,
        viewer: Option<PlayerId>,
    ) -> Result<GameView, ManagerError> {
        let game = self.store().load_game(game_id).await?;
        Ok(game.view_for(viewer_role(&game, viewer)))
    }

    pub async fn list_games(&self, player_id: PlayerId) -> Result<Vec<GameSummary>, ManagerError> {
        Ok(self.store().list_games_for_player(player_id).await?)
    }

    /// Apply a human move, then let any AI seats that are now due take their turns
    pub async fn submit_action(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<TickResponse, ManagerError> {
        let role = match action {
            PlayerAction::GiveClue { .. } => Role::Spymaster,
            PlayerAction::GuessCard { .. } | PlayerAction::Skip => Role::Operative,
        };

        let game = self.store().load_game(game_id).await?;
        let team = acting_team(&game, player_id, role)
            .ok_or(ManagerError::NotSeated { player_id, role })?;

        let submission = Submission::new(team, Actor::Human(player_id), action);
        let committed = self.committer.commit(game_id, Some(submission)).await?;

        let mut outcomes = vec![committed.outcome];
        let ai_error = self.drive_ai(game_id, &mut outcomes).await;
        self.respond(game_id, Some(player_id), outcomes, ai_error).await
    }

    /// Parameterless tick: applies timer expiry and drives AI seats
    pub async fn poll(
        &self,
        game_id: GameId,
        viewer: Option<PlayerId>,
    ) -> Result<TickResponse, ManagerError> {
        let committed = self.committer.commit(game_id, None).await?;

        let mut outcomes = Vec::new();
        if !committed.outcome.is_idle() {
            outcomes.push(committed.outcome);
        }
        let ai_error = self.drive_ai(game_id, &mut outcomes).await;
        self.respond(game_id, viewer, outcomes, ai_error).await
    }

    async fn respond(
        &self,
        game_id: GameId,
        viewer: Option<PlayerId>,
        outcomes: Vec<TickOutcome>,
        ai_error: Option<String>,
    ) -> Result<TickResponse, ManagerError> {
        let game = self.store().load_game(game_id).await?;
        Ok(TickResponse {
            outcomes,
            ai_error,
            game: game.view_for(viewer_role(&game, viewer)),
        })
    }

    /// Play AI seats until a human seat is due, the game ends, or `ai_seat_limit`
    /// activations have run. Failures come back as text; whatever was committed
    /// before the failure stays committed.
    pub async fn drive_ai(&self, game_id: GameId, outcomes: &mut Vec<TickOutcome>) -> Option<String> {
        let lock = self.drive_locks.entry(game_id).or_default().clone();
        let Ok(guard) = lock.try_lock() else {
            debug!(%game_id, "AI seats already being driven by another request");
            return None;
        };

        let error = self.drive_seats(game_id, outcomes).await;

        drop(guard);
        drop(lock);
        // Only the map holds the lock once every driver is done
        self.drive_locks
            .remove_if(&game_id, |_, lock| Arc::strong_count(lock) == 1);

        error
    }

    /// Number of games with an AI drive lock currently tracked.
    pub fn tracked_drive_locks(&self) -> usize {
        self.drive_locks.len()
    }

    async fn drive_seats(&self, game_id: GameId, outcomes: &mut Vec<TickOutcome>) -> Option<String> {
        let mut last_phase: Option<GamePhase> = None;
        for _ in 0..self.ai_seat_limit {
            let game = match self.store().load_game(game_id).await {
                Ok(game) => game,
                Err(e) => return Some(e.to_string()),
            };

            // Same phase twice in a row means the seat made no progress
            if last_phase == Some(game.phase) {
                break;
            }
            last_phase = Some(game.phase);

            let Some((team, role, SeatOccupant::Ai { model_id })) = game.active_seat() else {
                break;
            };
            let model_id = model_id.clone();

            let result = match role {
                Role::Spymaster => {
                    self.orchestrator
                        .play_spymaster(game_id, team, &model_id, outcomes)
                        .await
                }
                Role::Operative => {
                    self.orchestrator
                        .play_operative(game_id, team, &model_id, outcomes)
                        .await
                }
            };

            if let Err(e) = result {
                warn!(%game_id, %team, %role, model_id = %model_id, "AI seat failed to move: {}", e);
                return Some(e.to_string());
            }
        }

        None
    }
}

/// The due seat wins when the player holds it, so one human may sit on both teams.
/// Otherwise any seat of theirs with that role, so an out-of-turn action reports `WrongTurn`.
fn acting_team(game: &Game, player_id: PlayerId, role: Role) -> Option<Team> {
    if let Some((team, active_role)) = game.phase.active_seat() {
        let holds_active = active_role == role
            && matches!(
                game.seats.get(team, role),
                SeatOccupant::Human { player_id: id } if *id == player_id
            );
        if holds_active {
            return Some(team);
        }
    }
    game.seats.seat_of(player_id, role)
}

/// Spymaster seats see the key; any other seat sees only revealed colors
fn viewer_role(game: &Game, viewer: Option<PlayerId>) -> Option<Role> {
    let roles = game.seats.roles_of(viewer?);
    if roles.iter().any(|(_, role)| *role == Role::Spymaster) {
        Some(Role::Spymaster)
    } else {
        roles.first().map(|(_, role)| *role)
    }
}
