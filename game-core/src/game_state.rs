use chrono::{DateTime, Utc};
use game_types::{
    CardColor, CardView, Clue, EndReason, GameId, GamePhase, GameSummary, GameView, Hint, Move,
    Role, SeatAssignments, SeatOccupant, Team, TurnEndReason, TickOutcome, TurnTimer,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Board;

/// The game aggregate. Only the state machine mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub phase: GamePhase,
    pub board: Board,
    pub active_clue: Option<Clue>,
    pub remaining_guesses: Option<u32>, // Only set during a guess phase
    pub turn_timer: TurnTimer,
    pub moves: Vec<Move>,
    pub hints: Vec<Hint>,
    pub winner: Option<Team>,
    pub end_reason: Option<EndReason>,
    pub seats: SeatAssignments,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn new(
        id: GameId,
        board: Board,
        seats: SeatAssignments,
        turn_duration_seconds: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            phase: GamePhase::RedClue,
            board,
            active_clue: None,
            remaining_guesses: None,
            turn_timer: TurnTimer::start(now, turn_duration_seconds),
            moves: Vec::new(),
            hints: Vec::new(),
            winner: None,
            end_reason: None,
            seats,
            version: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Team on turn, or the winner once finished
    pub fn current_team(&self) -> Team {
        self.phase.team()
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn remaining(&self, team: Team) -> usize {
        self.board.remaining_count(team)
    }

    /// Seat expected to act next with whoever occupies it
    pub fn active_seat(&self) -> Option<(Team, Role, &SeatOccupant)> {
        self.phase
            .active_seat()
            .map(|(team, role)| (team, role, self.seats.get(team, role)))
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Moves made by the team on turn since its turn started. Derived from history every call.
    pub fn moves_this_turn(&self) -> impl Iterator<Item = &Move> {
        let team = self.current_team();
        let started_at = self.turn_timer.started_at;
        self.moves
            .iter()
            .filter(move |m| m.team == team && m.timestamp > started_at)
    }

    pub(crate) fn end_turn(&mut self, reason: TurnEndReason, now: DateTime<Utc>) -> TickOutcome {
        let team = self.current_team();
        self.phase = GamePhase::clue(team.opponent());
        self.active_clue = None;
        self.remaining_guesses = None;
        self.turn_timer = TurnTimer::start(now, self.turn_timer.duration_seconds);
        self.updated_at = now;

        info!(game_id = %self.id, %team, ?reason, "Turn ended");
        TickOutcome::TurnEnded { team, reason }
    }

    pub(crate) fn declare_winner(
        &mut self,
        winner: Team,
        reason: EndReason,
        now: DateTime<Utc>,
    ) -> TickOutcome {
        self.phase = GamePhase::win(winner);
        self.winner = Some(winner);
        self.end_reason = Some(reason);
        self.active_clue = None;
        self.remaining_guesses = None;
        self.completed_at = Some(now);
        self.updated_at = now;

        info!(game_id = %self.id, %winner, reason = reason.as_str(), "Game won");
        TickOutcome::GameWon { winner, reason }
    }

    /// Projection for a caller. Spymasters and finished games see every color.
    pub fn view_for(&self, role: Option<Role>) -> GameView {
        let show_all = role == Some(Role::Spymaster) || self.is_finished();

        let cards = self
            .board
            .cards()
            .iter()
            .map(|card| CardView {
                index: card.index,
                word: card.word.clone(),
                revealed: card.revealed,
                color: (show_all || card.revealed).then_some(card.color),
            })
            .collect();

        GameView {
            id: self.id,
            phase: self.phase,
            cards,
            remaining_red: self.remaining(Team::Red),
            remaining_blue: self.remaining(Team::Blue),
            active_clue: self.active_clue.clone(),
            remaining_guesses: self.remaining_guesses,
            turn_timer: self.turn_timer,
            moves: self.moves.clone(),
            hints: self.hints.clone(),
            winner: self.winner,
            end_reason: self.end_reason,
            seats: self.seats.clone(),
            version: self.version,
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id,
            phase: self.phase,
            winner: self.winner,
            seats: self.seats.clone(),
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }

    pub fn revealed_color(&self, index: usize) -> Option<CardColor> {
        self.board
            .cards()
            .get(index)
            .filter(|card| card.revealed)
            .map(|card| card.color)
    }
}
