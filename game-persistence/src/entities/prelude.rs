pub use super::game_hints::Entity as GameHints;
pub use super::game_moves::Entity as GameMoves;
pub use super::games::Entity as Games;
