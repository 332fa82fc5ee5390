use game_types::{EndReason, GameId, SeatAssignments, Team, TickOutcome, TurnEndReason};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameCreated {
        game_id: GameId,
        seats: SeatAssignments,
    },
    ClueGiven {
        game_id: GameId,
        team: Team,
        word: String,
        count: u32,
    },
    GuessCorrect {
        game_id: GameId,
        index: usize,
        remaining_guesses: u32,
    },
    TurnEnded {
        game_id: GameId,
        team: Team,
        reason: TurnEndReason,
    },
    GameWon {
        game_id: GameId,
        winner: Team,
        reason: EndReason,
    },
}

impl GameEvent {
    pub fn game_id(&self) -> GameId {
        match self {
            GameEvent::GameCreated { game_id, .. } => *game_id,
            GameEvent::ClueGiven { game_id, .. } => *game_id,
            GameEvent::GuessCorrect { game_id, .. } => *game_id,
            GameEvent::TurnEnded { game_id, .. } => *game_id,
            GameEvent::GameWon { game_id, .. } => *game_id,
        }
    }

    /// Idle ticks produce no event
    pub fn from_outcome(game_id: GameId, outcome: &TickOutcome) -> Option<GameEvent> {
        match outcome {
            TickOutcome::Idle => None,
            TickOutcome::ClueAccepted { clue, .. } => Some(GameEvent::ClueGiven {
                game_id,
                team: clue.team,
                word: clue.word.clone(),
                count: clue.count,
            }),
            TickOutcome::GuessCorrect {
                index,
                remaining_guesses,
            } => Some(GameEvent::GuessCorrect {
                game_id,
                index: *index,
                remaining_guesses: *remaining_guesses,
            }),
            TickOutcome::TurnEnded { team, reason } => Some(GameEvent::TurnEnded {
                game_id,
                team: *team,
                reason: *reason,
            }),
            TickOutcome::GameWon { winner, reason } => Some(GameEvent::GameWon {
                game_id,
                winner: *winner,
                reason: *reason,
            }),
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler: Send {
    fn handle_event(&mut self, event: &GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(&event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes every event to the tracing subscriber
pub struct TracingEventHandler;

impl GameEventHandler for TracingEventHandler {
    fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameCreated { game_id, .. } => info!(%game_id, "Game created"),
            GameEvent::ClueGiven {
                game_id,
                team,
                word,
                count,
            } => info!(%game_id, %team, %word, count, "Clue given"),
            GameEvent::GuessCorrect {
                game_id,
                index,
                remaining_guesses,
            } => info!(%game_id, index, remaining_guesses, "Correct guess"),
            GameEvent::TurnEnded {
                game_id,
                team,
                reason,
            } => info!(%game_id, %team, ?reason, "Turn over"),
            GameEvent::GameWon {
                game_id,
                winner,
                reason,
            } => info!(%game_id, %winner, reason = reason.as_str(), "Game over"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct TestHandler {
        events: Arc<Mutex<Vec<GameEvent>>>,
    }

    impl GameEventHandler for TestHandler {
        fn handle_event(&mut self, event: &GameEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_event_bus() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut bus = GameEventBus::new();
        bus.add_handler(Box::new(TestHandler {
            events: events.clone(),
        }));
        bus.add_handler(Box::new(TracingEventHandler));
        assert_eq!(bus.handler_count(), 2);

        let game_id = uuid::Uuid::new_v4();
        let event = GameEvent::TurnEnded {
            game_id,
            team: Team::Red,
            reason: TurnEndReason::Skipped,
        };
        bus.publish(event.clone());

        let seen = events.lock().unwrap();
        assert_eq!(seen.as_slice(), &[event]);
        assert_eq!(seen[0].game_id(), game_id);
    }

    #[test]
    fn test_idle_outcome_has_no_event() {
        let game_id = uuid::Uuid::new_v4();
        assert_eq!(GameEvent::from_outcome(game_id, &TickOutcome::Idle), None);

        let won = TickOutcome::GameWon {
            winner: Team::Blue,
            reason: EndReason::Assassin,
        };
        assert_eq!(
            GameEvent::from_outcome(game_id, &won),
            Some(GameEvent::GameWon {
                game_id,
                winner: Team::Blue,
                reason: EndReason::Assassin
            })
        );
    }
}
