#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use game_core::{Board, Game, GameEvent, GameEventHandler, Submission, WordBank};
use game_types::{
    Actor, Card, CardColor, GamePhase, PlayerAction, SeatAssignments, SeatOccupant, Team,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

pub const ASSASSIN_INDEX: usize = 24;
pub const FIRST_NEUTRAL: usize = 17;
pub const FIRST_BLUE: usize = 9;

/// Board with a known layout: Red 0..9, Blue 9..17, Neutral 17..24, Assassin 24
pub fn create_test_board() -> Board {
    let words = [
        "FISH", "APPLE", "TRAIN", "MOON", "HORSE", "PIANO", "BRIDGE", "CASTLE", "DIAMOND",
        "ROBOT", "PENGUIN", "THUNDER", "SHADOW", "PYRAMID", "LEMON", "ENGINE", "FOREST",
        "CARPET", "WHISTLE", "MARBLE", "TOWER", "PILOT", "SATURN", "HONEY", "BOMB",
    ];

    let cards = words
        .iter()
        .enumerate()
        .map(|(index, word)| Card {
            word: word.to_string(),
            color: color_at(index),
            revealed: false,
            index,
        })
        .collect();

    Board::from_cards(cards).unwrap()
}

pub fn color_at(index: usize) -> CardColor {
    match index {
        0..=8 => CardColor::Red,
        9..=16 => CardColor::Blue,
        17..=23 => CardColor::Neutral,
        _ => CardColor::Assassin,
    }
}

/// Indices holding the team's cards on the test board
pub fn team_indices(team: Team) -> Vec<usize> {
    match team {
        Team::Red => (0..9).collect(),
        Team::Blue => (9..17).collect(),
    }
}

pub fn create_seeded_board(seed: u64) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    Board::generate(&WordBank::default(), &mut rng).unwrap()
}

pub fn create_ai_seats() -> SeatAssignments {
    SeatAssignments {
        red_spymaster: SeatOccupant::Ai {
            model_id: "gpt-4o".to_string(),
        },
        red_operative: SeatOccupant::Ai {
            model_id: "gpt-4o-mini".to_string(),
        },
        blue_spymaster: SeatOccupant::Ai {
            model_id: "claude-3-5-sonnet".to_string(),
        },
        blue_operative: SeatOccupant::Ai {
            model_id: "claude-3-5-haiku".to_string(),
        },
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn seconds(offset: i64) -> DateTime<Utc> {
    start_time() + chrono::Duration::seconds(offset)
}

pub fn create_standard_game() -> Game {
    Game::new(
        uuid::Uuid::new_v4(),
        create_test_board(),
        create_ai_seats(),
        180,
        start_time(),
    )
}

pub fn give_clue(team: Team, word: &str, count: u32) -> Submission {
    Submission::new(
        team,
        Actor::Ai("spymaster".to_string()),
        PlayerAction::GiveClue {
            word: word.to_string(),
            count,
        },
    )
}

pub fn guess_card(team: Team, index: usize) -> Submission {
    Submission::new(
        team,
        Actor::Ai("operative".to_string()),
        PlayerAction::GuessCard { index },
    )
}

pub fn skip_turn(team: Team) -> Submission {
    Submission::new(team, Actor::Ai("operative".to_string()), PlayerAction::Skip)
}

/// Monotonic clock for driving a game through many ticks
pub struct TestClock {
    offset: i64,
}

impl TestClock {
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    pub fn next(&mut self) -> DateTime<Utc> {
        self.offset += 1;
        seconds(self.offset)
    }
}

/// Asserts that a game is in a specific phase
pub fn assert_phase(game: &Game, expected_phase: GamePhase) {
    assert_eq!(
        game.phase, expected_phase,
        "Expected phase {:?}, got {:?}",
        expected_phase, game.phase
    );
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: &GameEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
