pub mod connection;
pub mod entities;
pub mod memory_store;
pub mod repositories;
pub mod store;

pub use connection::*;
pub use memory_store::InMemoryGameStore;
pub use repositories::GameRepository;
pub use store::{GameStore, StoreError};
