use game_types::{GameError, GamePhase, PlayerAction, Team};

use crate::Game;
use crate::state_machine::Submission;

pub const MIN_CLUE_COUNT: u32 = 1;
pub const MAX_CLUE_COUNT: u32 = 9;

/// Rule checks for submitted moves. Pure reads, no game state is touched.
pub struct MoveValidator;

impl MoveValidator {
    pub fn validate(game: &Game, submission: &Submission) -> Result<(), GameError> {
        match &submission.action {
            PlayerAction::GiveClue { word, count } => {
                Self::validate_clue(game, submission.team, word, *count)
            }
            PlayerAction::GuessCard { index } => {
                Self::validate_guess(game, submission.team, *index)
            }
            PlayerAction::Skip => Self::validate_skip(game, submission.team),
        }
    }

    pub fn validate_clue(game: &Game, team: Team, word: &str, count: u32) -> Result<(), GameError> {
        Self::expect_phase(game, team, GamePhase::clue(team))?;

        if !(MIN_CLUE_COUNT..=MAX_CLUE_COUNT).contains(&count) {
            return Err(GameError::InvalidClue {
                reason: format!(
                    "count must be between {} and {}, got {}",
                    MIN_CLUE_COUNT, MAX_CLUE_COUNT, count
                ),
            });
        }

        // Checked before upper-casing, which can change the letters ("ß" becomes "SS")
        let trimmed = word.trim();
        if trimmed.is_empty() {
            return Err(GameError::InvalidClue {
                reason: "clue word is empty".to_string(),
            });
        }
        if !Self::is_alphabetic(trimmed) {
            return Err(GameError::InvalidClue {
                reason: format!("'{}' must be a single word of ASCII letters", trimmed),
            });
        }
        let word = normalize_clue(trimmed);

        // Equal, containing or contained, in either direction
        if let Some(card) = game.board.cards().iter().find(|card| {
            let board_word = card.word.to_uppercase();
            board_word.contains(&word) || word.contains(&board_word)
        }) {
            return Err(GameError::WordOnBoard {
                word,
                board_word: card.word.clone(),
            });
        }

        Ok(())
    }

    pub fn validate_guess(game: &Game, team: Team, index: usize) -> Result<(), GameError> {
        Self::expect_phase(game, team, GamePhase::guess(team))?;

        match &game.active_clue {
            Some(clue) if clue.team == team => {}
            _ => return Err(GameError::NoActiveClue),
        }

        let card = game.board.card(index)?;
        if card.revealed {
            return Err(GameError::AlreadyRevealed { index });
        }

        if game.remaining_guesses.unwrap_or(0) == 0 {
            return Err(GameError::NoGuessesRemaining);
        }

        Ok(())
    }

    pub fn validate_skip(game: &Game, team: Team) -> Result<(), GameError> {
        Self::expect_phase(game, team, GamePhase::guess(team))
    }

    /// ASCII letters only
    pub fn is_alphabetic(word: &str) -> bool {
        word.chars().all(|c| c.is_ascii_alphabetic())
    }

    fn expect_phase(game: &Game, team: Team, expected: GamePhase) -> Result<(), GameError> {
        if game.phase != expected {
            return Err(GameError::WrongTurn {
                team,
                phase: game.phase,
            });
        }
        Ok(())
    }
}

/// Clue words are compared and stored trimmed and upper-cased
pub fn normalize_clue(word: &str) -> String {
    word.trim().to_uppercase()
}
