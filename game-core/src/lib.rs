pub mod board;
pub mod context;
pub mod game_events;
pub mod game_state;
pub mod move_validator;
pub mod state_machine;
pub mod word_bank;

#[cfg(test)]
mod test_fixtures;

// Re-export main components
pub use board::*;
pub use context::*;
pub use game_events::*;
pub use game_state::*;
pub use move_validator::*;
pub use state_machine::*;
pub use word_bank::*;
