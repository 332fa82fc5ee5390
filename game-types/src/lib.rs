pub mod context;
pub mod errors;
pub mod game;
pub mod messages;
pub mod player;

pub type GameId = uuid::Uuid;
pub type PlayerId = uuid::Uuid;

// Re-export all types
pub use context::*;
pub use errors::*;
pub use game::*;
pub use messages::*;
pub use player::*;
