use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::game::{GamePhase, Team};

/// Rule violations. Always reported to the caller, never corrected silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
pub enum GameError {
    #[error("it is not {team}'s turn for that move (phase {phase})")]
    WrongTurn { team: Team, phase: GamePhase },
    #[error("invalid clue: {reason}")]
    InvalidClue { reason: String },
    #[error("clue '{word}' overlaps board word '{board_word}'")]
    WordOnBoard { word: String, board_word: String },
    #[error("card index {index} is out of range")]
    IndexOutOfRange { index: usize },
    #[error("card {index} has already been revealed")]
    AlreadyRevealed { index: usize },
    #[error("no active clue for the guessing team")]
    NoActiveClue,
    #[error("no guesses remaining this turn")]
    NoGuessesRemaining,
    #[error("invalid board: {reason}")]
    InvalidBoard { reason: String },
    #[error("word bank has {available} words, at least {required} are needed")]
    NotEnoughWords { available: usize, required: usize },
}
