use game_types::{Card, CardColor, GameError, Team};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::WordBank;

pub const BOARD_SIZE: usize = 25;

/// Fixed color distribution. Red starts and therefore holds the extra card.
pub const COLOR_DISTRIBUTION: [(CardColor, usize); 4] = [
    (CardColor::Red, 9),
    (CardColor::Blue, 8),
    (CardColor::Neutral, 7),
    (CardColor::Assassin, 1),
];

pub fn expected_count(color: CardColor) -> usize {
    COLOR_DISTRIBUTION
        .iter()
        .find(|(c, _)| *c == color)
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

/// The 25 card grid. Colors never change after construction, only `revealed` flips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Pick 25 words and shuffle the colors independently before pairing them up
    pub fn generate<R: Rng + ?Sized>(word_bank: &WordBank, rng: &mut R) -> Result<Self, GameError> {
        if word_bank.len() < BOARD_SIZE {
            return Err(GameError::NotEnoughWords {
                available: word_bank.len(),
                required: BOARD_SIZE,
            });
        }

        let mut words = word_bank.words().to_vec();
        words.shuffle(rng);
        words.truncate(BOARD_SIZE);

        let mut colors: Vec<CardColor> = COLOR_DISTRIBUTION
            .iter()
            .flat_map(|(color, count)| std::iter::repeat_n(*color, *count))
            .collect();
        colors.shuffle(rng);

        let cards = words
            .into_iter()
            .zip(colors)
            .enumerate()
            .map(|(index, (word, color))| Card {
                word,
                color,
                revealed: false,
                index,
            })
            .collect();

        Self::from_cards(cards)
    }

    /// Rebuild a board, checking size, indices and color distribution
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, GameError> {
        if cards.len() != BOARD_SIZE {
            return Err(GameError::InvalidBoard {
                reason: format!("expected {} cards, found {}", BOARD_SIZE, cards.len()),
            });
        }

        if let Some(card) = cards.iter().enumerate().find(|(i, card)| card.index != *i) {
            return Err(GameError::InvalidBoard {
                reason: format!("card at position {} has index {}", card.0, card.1.index),
            });
        }

        for (color, expected) in COLOR_DISTRIBUTION {
            let found = cards.iter().filter(|card| card.color == color).count();
            if found != expected {
                return Err(GameError::InvalidBoard {
                    reason: format!(
                        "expected {} {} cards, found {}",
                        expected,
                        color.as_str(),
                        found
                    ),
                });
            }
        }

        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Result<&Card, GameError> {
        self.cards
            .get(index)
            .ok_or(GameError::IndexOutOfRange { index })
    }

    pub fn reveal(&mut self, index: usize) -> Result<&Card, GameError> {
        let card = self
            .cards
            .get_mut(index)
            .ok_or(GameError::IndexOutOfRange { index })?;

        if card.revealed {
            return Err(GameError::AlreadyRevealed { index });
        }

        card.revealed = true;
        Ok(card)
    }

    /// Unrevealed cards of the team's color, counted fresh on every call
    pub fn remaining_count(&self, team: Team) -> usize {
        let color = CardColor::from(team);
        self.cards
            .iter()
            .filter(|card| card.color == color && !card.revealed)
            .count()
    }

    pub fn unrevealed_indices(&self) -> Vec<usize> {
        self.cards
            .iter()
            .filter(|card| !card.revealed)
            .map(|card| card.index)
            .collect()
    }
}

impl TryFrom<Vec<Card>> for Board {
    type Error = GameError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        Board::from_cards(cards)
    }
}

impl From<Board> for Vec<Card> {
    fn from(board: Board) -> Self {
        board.cards
    }
}
