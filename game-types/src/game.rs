use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::GameId;
use crate::player::SeatAssignments;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Team {
    Red,  // Starts the game and holds the extra card
    Blue,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }

    pub fn parse(value: &str) -> Option<Team> {
        match value {
            "red" => Some(Team::Red),
            "blue" => Some(Team::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Role {
    Spymaster,
    Operative,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Spymaster => f.write_str("spymaster"),
            Role::Operative => f.write_str("operative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CardColor {
    Red,
    Blue,
    Neutral,
    Assassin,
}

impl CardColor {
    pub fn as_str(self) -> &'static str {
        match self {
            CardColor::Red => "red",
            CardColor::Blue => "blue",
            CardColor::Neutral => "neutral",
            CardColor::Assassin => "assassin",
        }
    }

    pub fn parse(value: &str) -> Option<CardColor> {
        match value {
            "red" => Some(CardColor::Red),
            "blue" => Some(CardColor::Blue),
            "neutral" => Some(CardColor::Neutral),
            "assassin" => Some(CardColor::Assassin),
            _ => None,
        }
    }
}

impl From<Team> for CardColor {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => CardColor::Red,
            Team::Blue => CardColor::Blue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Card {
    pub word: String,
    pub color: CardColor,
    pub revealed: bool,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GamePhase {
    RedClue,
    RedGuess,
    BlueClue,
    BlueGuess,
    RedWin,
    BlueWin,
}

impl GamePhase {
    pub fn clue(team: Team) -> GamePhase {
        match team {
            Team::Red => GamePhase::RedClue,
            Team::Blue => GamePhase::BlueClue,
        }
    }

    pub fn guess(team: Team) -> GamePhase {
        match team {
            Team::Red => GamePhase::RedGuess,
            Team::Blue => GamePhase::BlueGuess,
        }
    }

    pub fn win(team: Team) -> GamePhase {
        match team {
            Team::Red => GamePhase::RedWin,
            Team::Blue => GamePhase::BlueWin,
        }
    }

    /// Team whose turn it is, or the winner once the game is over
    pub fn team(self) -> Team {
        match self {
            GamePhase::RedClue | GamePhase::RedGuess | GamePhase::RedWin => Team::Red,
            GamePhase::BlueClue | GamePhase::BlueGuess | GamePhase::BlueWin => Team::Blue,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::RedWin | GamePhase::BlueWin)
    }

    pub fn is_clue(self) -> bool {
        matches!(self, GamePhase::RedClue | GamePhase::BlueClue)
    }

    pub fn is_guess(self) -> bool {
        matches!(self, GamePhase::RedGuess | GamePhase::BlueGuess)
    }

    /// The seat expected to act next; `None` once the game has ended
    pub fn active_seat(self) -> Option<(Team, Role)> {
        match self {
            GamePhase::RedClue => Some((Team::Red, Role::Spymaster)),
            GamePhase::RedGuess => Some((Team::Red, Role::Operative)),
            GamePhase::BlueClue => Some((Team::Blue, Role::Spymaster)),
            GamePhase::BlueGuess => Some((Team::Blue, Role::Operative)),
            GamePhase::RedWin | GamePhase::BlueWin => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::RedClue => "RED_CLUE",
            GamePhase::RedGuess => "RED_GUESS",
            GamePhase::BlueClue => "BLUE_CLUE",
            GamePhase::BlueGuess => "BLUE_GUESS",
            GamePhase::RedWin => "RED_WIN",
            GamePhase::BlueWin => "BLUE_WIN",
        }
    }

    pub fn parse(value: &str) -> Option<GamePhase> {
        match value {
            "RED_CLUE" => Some(GamePhase::RedClue),
            "RED_GUESS" => Some(GamePhase::RedGuess),
            "BLUE_CLUE" => Some(GamePhase::BlueClue),
            "BLUE_GUESS" => Some(GamePhase::BlueGuess),
            "RED_WIN" => Some(GamePhase::RedWin),
            "BLUE_WIN" => Some(GamePhase::BlueWin),
            _ => None,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum EndReason {
    Assassin,
    AllWordsFound,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::Assassin => "assassin",
            EndReason::AllWordsFound => "all_words_found",
        }
    }

    pub fn parse(value: &str) -> Option<EndReason> {
        match value {
            "assassin" => Some(EndReason::Assassin),
            "all_words_found" => Some(EndReason::AllWordsFound),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Clue {
    pub team: Team,
    pub word: String,
    pub count: u32,
    pub issued_at: DateTime<Utc>,
}

/// One revealed card. Moves are append-only and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Move {
    pub team: Team,
    pub index: usize,
    pub color: CardColor,
    pub by_player: String, // Human id or "AI:<model-id>"
    pub timestamp: DateTime<Utc>,
}

impl Move {
    pub fn is_success(&self) -> bool {
        self.color == CardColor::from(self.team)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Hint {
    pub team: Team,
    pub word: String,
    pub count: u32,
    pub by_player: String,
    pub reasoning: Option<String>,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TurnTimer {
    pub started_at: DateTime<Utc>,
    pub duration_seconds: u32,
}

impl TurnTimer {
    pub fn start(now: DateTime<Utc>, duration_seconds: u32) -> Self {
        Self {
            started_at: now,
            duration_seconds,
        }
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.started_at + chrono::Duration::seconds(i64::from(self.duration_seconds))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TurnEndReason {
    WrongGuess { color: CardColor },
    GuessesExhausted,
    Skipped,
    TimerExpired,
}

/// What a single tick of the state machine did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TickOutcome {
    Idle,
    ClueAccepted { clue: Clue, remaining_guesses: u32 },
    GuessCorrect { index: usize, remaining_guesses: u32 },
    TurnEnded { team: Team, reason: TurnEndReason },
    GameWon { winner: Team, reason: EndReason },
}

impl TickOutcome {
    pub fn is_idle(&self) -> bool {
        matches!(self, TickOutcome::Idle)
    }

    /// True when the acting team no longer holds the turn
    pub fn ends_turn(&self) -> bool {
        matches!(self, TickOutcome::TurnEnded { .. } | TickOutcome::GameWon { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CardView {
    pub index: usize,
    pub word: String,
    pub revealed: bool,
    pub color: Option<CardColor>, // Hidden unless revealed or viewed by a spymaster
}

/// Role-restricted projection returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameView {
    pub id: GameId,
    pub phase: GamePhase,
    pub cards: Vec<CardView>,
    pub remaining_red: usize,
    pub remaining_blue: usize,
    pub active_clue: Option<Clue>,
    pub remaining_guesses: Option<u32>,
    pub turn_timer: TurnTimer,
    pub moves: Vec<Move>,
    pub hints: Vec<Hint>,
    pub winner: Option<Team>,
    pub end_reason: Option<EndReason>,
    pub seats: SeatAssignments,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSummary {
    pub id: GameId,
    pub phase: GamePhase,
    pub winner: Option<Team>,
    pub seats: SeatAssignments,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
