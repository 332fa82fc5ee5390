pub mod game_hints;
pub mod game_moves;
pub mod games;
pub mod prelude;
