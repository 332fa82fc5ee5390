use game_types::{
    ClueView, GameContext, OperativeCard, OperativeContext, PreviousGuess, Role, SpymasterCard,
    SpymasterContext, Team,
};

use crate::Game;

/// Role-restricted view handed to an AI seat. Rebuilt from the game on every call.
pub fn build_context(game: &Game, team: Team, role: Role) -> GameContext {
    match role {
        Role::Spymaster => GameContext::Spymaster(spymaster_context(game, team)),
        Role::Operative => GameContext::Operative(operative_context(game, team)),
    }
}

pub fn spymaster_context(game: &Game, team: Team) -> SpymasterContext {
    let cards = game
        .board
        .cards()
        .iter()
        .map(|card| SpymasterCard {
            index: card.index,
            word: card.word.clone(),
            color: card.color,
            revealed: card.revealed,
        })
        .collect();

    SpymasterContext {
        team,
        phase: game.phase,
        current_team: game.current_team(),
        remaining_red: game.remaining(Team::Red),
        remaining_blue: game.remaining(Team::Blue),
        active_clue: clue_view(game),
        cards,
    }
}

pub fn operative_context(game: &Game, team: Team) -> OperativeContext {
    let cards = game
        .board
        .cards()
        .iter()
        .map(|card| OperativeCard {
            index: card.index,
            word: card.word.clone(),
            revealed: card.revealed,
            color: card.revealed.then_some(card.color),
        })
        .collect();

    let previous_guesses = game
        .moves_this_turn()
        .map(|m| PreviousGuess {
            index: m.index,
            word: game
                .board
                .cards()
                .get(m.index)
                .map(|card| card.word.clone())
                .unwrap_or_default(),
            color: m.color,
            success: m.is_success(),
        })
        .collect();

    OperativeContext {
        team,
        phase: game.phase,
        current_team: game.current_team(),
        remaining_red: game.remaining(Team::Red),
        remaining_blue: game.remaining(Team::Blue),
        active_clue: clue_view(game),
        cards,
        available_moves: game.board.unrevealed_indices(),
        remaining_guesses: game.remaining_guesses,
        previous_guesses,
    }
}

fn clue_view(game: &Game) -> Option<ClueView> {
    game.active_clue.as_ref().map(|clue| ClueView {
        word: clue.word.clone(),
        count: clue.count,
    })
}
