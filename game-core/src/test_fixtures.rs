use chrono::{DateTime, TimeZone, Utc};
use game_types::{Actor, Card, CardColor, PlayerAction, SeatAssignments, SeatOccupant, Team};
use uuid::Uuid;

use crate::{Board, Game, Submission};

pub const RED_WORDS: [&str; 9] = [
    "FISH", "APPLE", "TRAIN", "MOON", "HORSE", "PIANO", "BRIDGE", "CASTLE", "DIAMOND",
];
pub const BLUE_WORDS: [&str; 8] = [
    "ROBOT", "PENGUIN", "THUNDER", "SHADOW", "PYRAMID", "LEMON", "ENGINE", "FOREST",
];
pub const NEUTRAL_WORDS: [&str; 7] = [
    "CARPET", "WHISTLE", "MARBLE", "TOWER", "PILOT", "SATURN", "HONEY",
];
pub const ASSASSIN_INDEX: usize = 24;

/// Red at 0..9, Blue at 9..17, Neutral at 17..24, Assassin at 24
pub fn fixed_board() -> Board {
    let colored = RED_WORDS
        .iter()
        .map(|w| (*w, CardColor::Red))
        .chain(BLUE_WORDS.iter().map(|w| (*w, CardColor::Blue)))
        .chain(NEUTRAL_WORDS.iter().map(|w| (*w, CardColor::Neutral)))
        .chain(std::iter::once(("BOMB", CardColor::Assassin)));

    let cards = colored
        .enumerate()
        .map(|(index, (word, color))| Card {
            word: word.to_string(),
            color,
            revealed: false,
            index,
        })
        .collect();

    Board::from_cards(cards).unwrap()
}

pub fn ai_seats() -> SeatAssignments {
    let ai = |model: &str| SeatOccupant::Ai {
        model_id: model.to_string(),
    };
    SeatAssignments {
        red_spymaster: ai("red-spy"),
        red_operative: ai("red-op"),
        blue_spymaster: ai("blue-spy"),
        blue_operative: ai("blue-op"),
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    t0() + chrono::Duration::seconds(seconds)
}

pub fn new_game() -> Game {
    Game::new(Uuid::new_v4(), fixed_board(), ai_seats(), 180, t0())
}

pub fn clue(team: Team, word: &str, count: u32) -> Submission {
    Submission::new(
        team,
        Actor::Ai(format!("{}-spy", team)),
        PlayerAction::GiveClue {
            word: word.to_string(),
            count,
        },
    )
}

pub fn guess(team: Team, index: usize) -> Submission {
    Submission::new(
        team,
        Actor::Ai(format!("{}-op", team)),
        PlayerAction::GuessCard { index },
    )
}

pub fn skip(team: Team) -> Submission {
    Submission::new(team, Actor::Ai(format!("{}-op", team)), PlayerAction::Skip)
}

/// Red holding an OCEAN clue for `count`, one second after the game started
pub fn game_in_red_guess(count: u32) -> Game {
    let mut game = new_game();
    game.tick(Some(clue(Team::Red, "OCEAN", count)), at(1)).unwrap();
    game
}
