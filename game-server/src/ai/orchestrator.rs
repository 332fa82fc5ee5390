use game_core::{BOARD_SIZE, MoveValidator, Submission, operative_context, spymaster_context};
use game_types::{Actor, GameError, GameId, GamePhase, PlayerAction, Team, TickOutcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{GenerationError, GuessProvider, HintProvider, ProviderError};
use crate::commit::TurnCommitter;
use crate::errors::ManagerError;

/// Plays AI seats by asking a provider for a move and committing it
pub struct AiOrchestrator {
    committer: Arc<TurnCommitter>,
    hints: Arc<dyn HintProvider>,
    guesses: Arc<dyn GuessProvider>,
    provider_timeout: Duration,
    guess_delay: Duration,
}

impl AiOrchestrator {
    pub fn new(
        committer: Arc<TurnCommitter>,
        hints: Arc<dyn HintProvider>,
        guesses: Arc<dyn GuessProvider>,
        provider_timeout: Duration,
        guess_delay: Duration,
    ) -> Self {
        Self {
            committer,
            hints,
            guesses,
            provider_timeout,
            guess_delay,
        }
    }

    async fn call_provider<T, F>(&self, model_id: &str, call: F) -> Result<T, GenerationError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.provider_timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(GenerationError::Timeout {
                model_id: model_id.to_string(),
                seconds: self.provider_timeout.as_secs(),
            }),
        }
    }

    /// Ask the model for one clue and commit it. An unusable clue commits nothing.
    pub async fn play_spymaster(
        &self,
        game_id: GameId,
        team: Team,
        model_id: &str,
        outcomes: &mut Vec<TickOutcome>,
    ) -> Result<(), ManagerError> {
        let game = self.committer.store().load_game(game_id).await?;
        if game.phase != GamePhase::clue(team) {
            debug!(%game_id, %team, phase = %game.phase, "Clue no longer due, skipping spymaster");
            return Ok(());
        }
        let context = spymaster_context(&game, team);

        let hint = self
            .call_provider(model_id, self.hints.generate_hint(model_id, &context))
            .await?;
        debug!(%game_id, model_id, ?hint, "Spymaster hint received");

        let count = u32::try_from(hint.count).map_err(|_| {
            GenerationError::ClueGenerationFailed(format!("invalid count {}", hint.count))
        })?;
        MoveValidator::validate_clue(&game, team, &hint.word, count).map_err(|e| {
            warn!(%game_id, model_id, word = %hint.word, "Model proposed an invalid clue: {}", e);
            GenerationError::ClueGenerationFailed(e.to_string())
        })?;

        let submission = Submission::new(
            team,
            Actor::Ai(model_id.to_string()),
            PlayerAction::GiveClue {
                word: hint.word,
                count,
            },
        )
        .with_reasoning(hint.reasoning);

        let committed = self.committer.commit(game_id, Some(submission)).await?;
        outcomes.push(committed.outcome);
        Ok(())
    }

    /// Guess until the turn ends. Each pass starts from freshly loaded state, so a
    /// turn that ended elsewhere stops the loop before the next provider call.
    pub async fn play_operative(
        &self,
        game_id: GameId,
        team: Team,
        model_id: &str,
        outcomes: &mut Vec<TickOutcome>,
    ) -> Result<(), ManagerError> {
        loop {
            let game = self.committer.store().load_game(game_id).await?;
            if game.phase != GamePhase::guess(team) {
                debug!(%game_id, phase = %game.phase, "Guess phase over, operative stops");
                return Ok(());
            }

            let context = operative_context(&game, team);
            let guess = self
                .call_provider(model_id, self.guesses.generate_guess(model_id, &context))
                .await?;
            debug!(%game_id, model_id, ?guess, "Operative guess received");

            let index = usize::try_from(guess.card_index)
                .ok()
                .filter(|index| *index < BOARD_SIZE)
                .ok_or_else(|| {
                    GenerationError::GuessGenerationFailed(format!(
                        "card index {} is off the board",
                        guess.card_index
                    ))
                })?;

            if game.revealed_color(index).is_some() {
                warn!(%game_id, model_id, index, "Model picked a revealed card, ending its turn early");
                return Ok(());
            }

            let submission = Submission::new(
                team,
                Actor::Ai(model_id.to_string()),
                PlayerAction::GuessCard { index },
            )
            .with_reasoning(guess.reasoning);

            let committed = match self.committer.commit(game_id, Some(submission)).await {
                Ok(committed) => committed,
                Err(ManagerError::Game(GameError::WrongTurn { .. })) => {
                    info!(%game_id, "Turn moved on before the guess landed");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let outcome = committed.outcome;
            let done = outcome.is_idle() || outcome.ends_turn();
            outcomes.push(outcome);
            if done {
                return Ok(());
            }

            tokio::time::sleep(self.guess_delay).await;
        }
    }
}
