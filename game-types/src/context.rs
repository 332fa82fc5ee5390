use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::game::{CardColor, GamePhase, Team};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClueView {
    pub word: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpymasterCard {
    pub index: usize,
    pub word: String,
    pub color: CardColor,
    pub revealed: bool,
}

/// Operatives only learn a card's color once it has been revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OperativeCard {
    pub index: usize,
    pub word: String,
    pub revealed: bool,
    pub color: Option<CardColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviousGuess {
    pub index: usize,
    pub word: String,
    pub color: CardColor,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpymasterContext {
    pub team: Team,
    pub phase: GamePhase,
    pub current_team: Team,
    pub remaining_red: usize,
    pub remaining_blue: usize,
    pub active_clue: Option<ClueView>,
    pub cards: Vec<SpymasterCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OperativeContext {
    pub team: Team,
    pub phase: GamePhase,
    pub current_team: Team,
    pub remaining_red: usize,
    pub remaining_blue: usize,
    pub active_clue: Option<ClueView>,
    pub cards: Vec<OperativeCard>,
    pub available_moves: Vec<usize>,
    pub remaining_guesses: Option<u32>,
    pub previous_guesses: Vec<PreviousGuess>,
}

impl SpymasterContext {
    pub fn remaining_for(&self, team: Team) -> usize {
        match team {
            Team::Red => self.remaining_red,
            Team::Blue => self.remaining_blue,
        }
    }
}

impl OperativeContext {
    pub fn is_available(&self, index: usize) -> bool {
        self.available_moves.contains(&index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameContext {
    Spymaster(SpymasterContext),
    Operative(OperativeContext),
}

impl GameContext {
    pub fn into_spymaster(self) -> Option<SpymasterContext> {
        match self {
            GameContext::Spymaster(context) => Some(context),
            GameContext::Operative(_) => None,
        }
    }

    pub fn into_operative(self) -> Option<OperativeContext> {
        match self {
            GameContext::Operative(context) => Some(context),
            GameContext::Spymaster(_) => None,
        }
    }
}
