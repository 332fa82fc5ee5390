//! Turn state machine.
//!
//! A tick scans [`TRANSITION_PRIORITY`] and applies the first transition whose guard
//! holds. Guards read the game, the optional submission and the supplied clock. Effects
//! validate before mutating, so a failed tick leaves the game exactly as it was.

use chrono::{DateTime, Utc};
use game_types::{
    Actor, CardColor, Clue, EndReason, GameError, GamePhase, Hint, Move, PlayerAction, Team,
    TickOutcome, TurnEndReason,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::move_validator::normalize_clue;
use crate::{Game, MoveValidator};

/// An action offered to the state machine on behalf of a seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub team: Team,
    pub actor: Actor,
    pub action: PlayerAction,
    pub reasoning: Option<String>,
}

impl Submission {
    pub fn new(team: Team, actor: Actor, action: PlayerAction) -> Self {
        Self {
            team,
            actor,
            action,
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: Option<String>) -> Self {
        self.reasoning = reasoning;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    AssassinWin,
    WordsFoundWin,
    TimerExpiry,
    ClueSubmitted,
    GuessSubmitted,
    SkipSubmitted,
}

/// Order in which guards are evaluated. Wins outrank the clock, the clock outranks actions.
pub const TRANSITION_PRIORITY: [Transition; 6] = [
    Transition::AssassinWin,
    Transition::WordsFoundWin,
    Transition::TimerExpiry,
    Transition::ClueSubmitted,
    Transition::GuessSubmitted,
    Transition::SkipSubmitted,
];

impl Transition {
    pub fn guard(self, game: &Game, submission: Option<&Submission>, now: DateTime<Utc>) -> bool {
        if game.is_finished() {
            return false;
        }

        let action = submission.map(|s| &s.action);
        match self {
            Transition::AssassinWin => assassin_winner(game).is_some(),
            Transition::WordsFoundWin => words_found_winner(game).is_some(),
            Transition::TimerExpiry => game.turn_timer.is_expired(now),
            Transition::ClueSubmitted => {
                game.phase.is_clue() && matches!(action, Some(PlayerAction::GiveClue { .. }))
            }
            Transition::GuessSubmitted => {
                game.phase.is_guess() && matches!(action, Some(PlayerAction::GuessCard { .. }))
            }
            Transition::SkipSubmitted => {
                game.phase.is_guess() && matches!(action, Some(PlayerAction::Skip))
            }
        }
    }

    fn apply(
        self,
        game: &mut Game,
        submission: Option<Submission>,
        now: DateTime<Utc>,
    ) -> Result<TickOutcome, GameError> {
        match self {
            Transition::AssassinWin | Transition::WordsFoundWin => {
                Ok(resolve_win(game, now).unwrap_or(TickOutcome::Idle))
            }
            Transition::TimerExpiry => {
                if let Some(discarded) = submission {
                    debug!(game_id = %game.id, action = ?discarded.action, "Discarding action submitted after the timer expired");
                }
                Ok(game.end_turn(TurnEndReason::TimerExpired, now))
            }
            Transition::ClueSubmitted
            | Transition::GuessSubmitted
            | Transition::SkipSubmitted => {
                let Some(submission) = submission else {
                    return Ok(TickOutcome::Idle);
                };
                apply_submission(game, submission, now)
            }
        }
    }
}

impl Game {
    /// Advance the game by at most one transition.
    pub fn tick(
        &mut self,
        submission: Option<Submission>,
        now: DateTime<Utc>,
    ) -> Result<TickOutcome, GameError> {
        if self.is_finished() {
            return Ok(TickOutcome::Idle);
        }

        let fired = TRANSITION_PRIORITY
            .into_iter()
            .find(|transition| transition.guard(self, submission.as_ref(), now));

        match fired {
            Some(transition) => {
                debug!(game_id = %self.id, ?transition, phase = %self.phase, "Transition fired");
                transition.apply(self, submission, now)
            }
            None => match submission {
                // Surface the reason the action was not accepted
                Some(submission) => {
                    MoveValidator::validate(self, &submission)?;
                    Ok(TickOutcome::Idle)
                }
                None => Ok(TickOutcome::Idle),
            },
        }
    }
}

fn apply_submission(
    game: &mut Game,
    submission: Submission,
    now: DateTime<Utc>,
) -> Result<TickOutcome, GameError> {
    let Submission {
        team,
        actor,
        action,
        reasoning,
    } = submission;

    match action {
        PlayerAction::GiveClue { word, count } => {
            MoveValidator::validate_clue(game, team, &word, count)?;
            let word = normalize_clue(&word);

            let clue = Clue {
                team,
                word: word.clone(),
                count,
                issued_at: now,
            };
            let remaining_guesses = count + 1;

            game.active_clue = Some(clue.clone());
            game.remaining_guesses = Some(remaining_guesses);
            game.phase = GamePhase::guess(team);
            game.hints.push(Hint {
                team,
                word,
                count,
                by_player: actor.to_string(),
                reasoning,
                issued_at: now,
            });
            game.updated_at = now;

            info!(game_id = %game.id, %team, clue = %clue.word, count, by = %actor, "Clue accepted");
            Ok(TickOutcome::ClueAccepted {
                clue,
                remaining_guesses,
            })
        }
        PlayerAction::GuessCard { index } => {
            MoveValidator::validate_guess(game, team, index)?;
            let color = game.board.reveal(index)?.color;

            game.moves.push(Move {
                team,
                index,
                color,
                by_player: actor.to_string(),
                timestamp: now,
            });
            game.updated_at = now;
            info!(game_id = %game.id, %team, index, color = color.as_str(), by = %actor, "Card revealed");

            if let Some(won) = resolve_win(game, now) {
                return Ok(won);
            }

            if color != CardColor::from(team) {
                return Ok(game.end_turn(TurnEndReason::WrongGuess { color }, now));
            }

            let remaining_guesses = game.remaining_guesses.unwrap_or(0).saturating_sub(1);
            if remaining_guesses == 0 {
                return Ok(game.end_turn(TurnEndReason::GuessesExhausted, now));
            }

            game.remaining_guesses = Some(remaining_guesses);
            Ok(TickOutcome::GuessCorrect {
                index,
                remaining_guesses,
            })
        }
        PlayerAction::Skip => {
            MoveValidator::validate_skip(game, team)?;
            Ok(game.end_turn(TurnEndReason::Skipped, now))
        }
    }
}

/// Re-runs the win guards in priority order against the current state
fn resolve_win(game: &mut Game, now: DateTime<Utc>) -> Option<TickOutcome> {
    if let Some(winner) = assassin_winner(game) {
        return Some(game.declare_winner(winner, EndReason::Assassin, now));
    }
    if let Some(winner) = words_found_winner(game) {
        return Some(game.declare_winner(winner, EndReason::AllWordsFound, now));
    }
    None
}

fn assassin_winner(game: &Game) -> Option<Team> {
    if !game.phase.is_guess() {
        return None;
    }
    let guessing = game.current_team();
    game.last_move()
        .filter(|m| m.team == guessing && m.color == CardColor::Assassin)
        .map(|_| guessing.opponent())
}

fn words_found_winner(game: &Game) -> Option<Team> {
    if !game.phase.is_guess() {
        return None;
    }
    let guessing = game.current_team();
    if game.remaining(guessing) == 0 {
        Some(guessing)
    } else if game.remaining(guessing.opponent()) == 0 {
        Some(guessing.opponent())
    } else {
        None
    }
}
