use game_types::{CardColor, OperativeContext, SpymasterContext};
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str =
    "You are playing a word association board game. Respond with valid JSON only.";

pub fn spymaster_prompt(context: &SpymasterContext) -> String {
    let team = context.team;
    let mut board = String::new();
    for card in &context.cards {
        let _ = writeln!(
            board,
            "{}: {} ({}){}",
            card.index,
            card.word,
            card.color.as_str(),
            if card.revealed { " [revealed]" } else { "" }
        );
    }

    let forbidden = context
        .cards
        .iter()
        .map(|card| card.word.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let targets = context
        .cards
        .iter()
        .filter(|card| !card.revealed && card.color == CardColor::from(team))
        .map(|card| card.word.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are the {team} spymaster.\n\
         Board:\n{board}\n\
         Your team still has {remaining} words to find: {targets}\n\
         Avoid clues that point at the assassin or the other team's words.\n\
         Your clue must be a single word. It may not equal, contain, or be contained in any of: {forbidden}\n\
         Respond with JSON: {{\"word\": \"<clue>\", \"number\": <how many words it covers>, \"reasoning\": \"<short explanation>\"}}",
        remaining = context.remaining_for(team),
    )
}

pub fn operative_prompt(context: &OperativeContext) -> String {
    let clue = context
        .active_clue
        .as_ref()
        .map(|clue| format!("\"{}\" for {}", clue.word, clue.count))
        .unwrap_or_else(|| "none".to_string());

    let mut available = String::new();
    for card in context.cards.iter().filter(|card| !card.revealed) {
        let _ = writeln!(available, "{}: {}", card.index, card.word);
    }

    let mut previous = String::new();
    for guess in &context.previous_guesses {
        let _ = writeln!(
            previous,
            "{} ({})",
            guess.word,
            if guess.success { "CORRECT" } else { "WRONG" }
        );
    }
    if previous.is_empty() {
        previous.push_str("none\n");
    }

    format!(
        "You are the {team} operative.\n\
         Clue: {clue}\n\
         Guesses left this turn: {left}\n\
         Unrevealed cards:\n{available}\n\
         Guesses so far this turn:\n{previous}\n\
         Pick one unrevealed card by its index.\n\
         Respond with JSON: {{\"cardIndex\": <index>, \"confidence\": <0 to 1>, \"reasoning\": \"<short explanation>\"}}",
        team = context.team,
        left = context
            .remaining_guesses
            .map(|n| n.to_string())
            .unwrap_or_else(|| "0".to_string()),
    )
}
