
use game_core::{GameEvent, Submission};
use game_persistence::InMemoryGameStore;
use game_server::config::Config;
use game_server::errors::ManagerError;
use game_types::{
    Actor, CardColor, GameError, GamePhase, PlayerAction, Role, SeatAssignments, Team,
    TickOutcome, TurnEndReason,
};
use std::sync::Arc;
use test_helpers::*;
use uuid::Uuid;

#[tokio::test]
async fn test_game_creation_basic() {
    let setup = TestSetup::new();
    let players = Players::new();

    let view = setup.game_manager.create_game(players.seats()).await.unwrap();

    assert_eq!(view.phase, GamePhase::RedClue);
    assert_eq!(view.cards.len(), 25);
    assert_eq!(view.remaining_red, 9);
    assert_eq!(view.remaining_blue, 8);
    assert_eq!(view.version, 0);
    assert!(view.cards.iter().all(|card| card.color.is_none()));
    assert!(matches!(
        setup.events().first(),
        Some(GameEvent::GameCreated { game_id, .. }) if *game_id == view.id
    ));
}

#[tokio::test]
async fn test_views_are_role_restricted() {
    let setup = TestSetup::new();
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;

    let spymaster = setup
        .game_manager
        .get_view(game_id, Some(players.red_spymaster))
        .await
        .unwrap();
    assert!(spymaster.cards.iter().all(|card| card.color.is_some()));

    let operative = setup
        .game_manager
        .get_view(game_id, Some(players.blue_operative))
        .await
        .unwrap();
    assert!(operative.cards.iter().all(|card| card.color.is_none()));

    let stranger = setup.game_manager.get_view(game_id, None).await.unwrap();
    assert!(stranger.cards.iter().all(|card| card.color.is_none()));
}

#[tokio::test]
async fn test_list_games_for_player() {
    let setup = TestSetup::new();
    let players = Players::new();
    let first = setup.create(players.seats()).await;
    let second = setup.create(players.seats()).await;
    setup.create(Players::new().seats()).await;

    let games = setup
        .game_manager
        .list_games(players.red_operative)
        .await
        .unwrap();
    let ids: Vec<_> = games.iter().map(|summary| summary.id).collect();

    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first));
    assert!(ids.contains(&second));
}

#[tokio::test]
async fn test_human_turn_sequence() {
    let setup = TestSetup::new();
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;
    let red = setup.indices_of(game_id, CardColor::Red).await;
    let neutral = setup.indices_of(game_id, CardColor::Neutral).await;

    let response = setup
        .game_manager
        .submit_action(
            game_id,
            players.red_spymaster,
            PlayerAction::GiveClue {
                word: SAFE_CLUE.to_lowercase(),
                count: 2,
            },
        )
        .await
        .unwrap();
    assert!(matches!(
        response.outcomes.as_slice(),
        [TickOutcome::ClueAccepted { remaining_guesses: 3, .. }]
    ));
    assert_eq!(response.game.phase, GamePhase::RedGuess);
    assert!(response.ai_error.is_none());

    let response = setup
        .game_manager
        .submit_action(
            game_id,
            players.red_operative,
            PlayerAction::GuessCard {
                index: red[0] as usize,
            },
        )
        .await
        .unwrap();
    assert_eq!(
        response.outcomes,
        vec![TickOutcome::GuessCorrect {
            index: red[0] as usize,
            remaining_guesses: 2
        }]
    );
    assert_eq!(response.game.remaining_red, 8);

    let response = setup
        .game_manager
        .submit_action(
            game_id,
            players.red_operative,
            PlayerAction::GuessCard {
                index: neutral[0] as usize,
            },
        )
        .await
        .unwrap();
    assert_eq!(
        response.outcomes,
        vec![TickOutcome::TurnEnded {
            team: Team::Red,
            reason: TurnEndReason::WrongGuess {
                color: CardColor::Neutral
            }
        }]
    );
    assert_eq!(response.game.phase, GamePhase::BlueClue);

    let game = setup.load(game_id).await;
    assert_eq!(game.version, 3);
    assert_eq!(game.hints.len(), 1);
    assert_eq!(game.hints[0].word, SAFE_CLUE);
    assert_eq!(game.hints[0].by_player, players.red_spymaster.to_string());
    assert_eq!(game.moves.len(), 2);
    assert!(game
        .moves
        .iter()
        .all(|m| m.by_player == players.red_operative.to_string()));
}

#[tokio::test]
async fn test_skip_ends_turn() {
    let setup = TestSetup::new();
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;

    setup
        .game_manager
        .submit_action(
            game_id,
            players.red_spymaster,
            PlayerAction::GiveClue {
                word: SAFE_CLUE.to_string(),
                count: 1,
            },
        )
        .await
        .unwrap();

    let response = setup
        .game_manager
        .submit_action(game_id, players.red_operative, PlayerAction::Skip)
        .await
        .unwrap();
    assert_eq!(
        response.outcomes,
        vec![TickOutcome::TurnEnded {
            team: Team::Red,
            reason: TurnEndReason::Skipped
        }]
    );
    assert_eq!(response.game.phase, GamePhase::BlueClue);
    assert!(response.game.active_clue.is_none());
}

#[tokio::test]
async fn test_player_not_seated() {
    let setup = TestSetup::new();
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;

    let stranger = Uuid::new_v4();
    let err = setup
        .game_manager
        .submit_action(game_id, stranger, PlayerAction::Skip)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::NotSeated { player_id, role: Role::Operative } if player_id == stranger
    ));

    // An operative cannot give clues
    let err = setup
        .game_manager
        .submit_action(
            game_id,
            players.red_operative,
            PlayerAction::GiveClue {
                word: SAFE_CLUE.to_string(),
                count: 1,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::NotSeated {
            role: Role::Spymaster,
            ..
        }
    ));
}

#[tokio::test]
async fn test_one_human_holding_both_spymaster_seats() {
    let setup = TestSetup::new();
    let spymaster = Uuid::new_v4();
    let operative = Uuid::new_v4();
    let seats = SeatAssignments {
        red_spymaster: human(spymaster),
        red_operative: human(operative),
        blue_spymaster: human(spymaster),
        blue_operative: human(operative),
    };
    let game_id = setup.create(seats).await;

    setup
        .game_manager
        .submit_action(
            game_id,
            spymaster,
            PlayerAction::GiveClue {
                word: SAFE_CLUE.to_string(),
                count: 1,
            },
        )
        .await
        .unwrap();
    setup
        .game_manager
        .submit_action(game_id, operative, PlayerAction::Skip)
        .await
        .unwrap();

    let response = setup
        .game_manager
        .submit_action(
            game_id,
            spymaster,
            PlayerAction::GiveClue {
                word: SAFE_CLUE.to_string(),
                count: 2,
            },
        )
        .await
        .unwrap();
    assert!(matches!(
        &response.outcomes[..],
        [TickOutcome::ClueAccepted { clue, .. }] if clue.team == Team::Blue
    ));
    assert_eq!(response.game.phase, GamePhase::BlueGuess);

    let response = setup
        .game_manager
        .submit_action(game_id, operative, PlayerAction::Skip)
        .await
        .unwrap();
    assert_eq!(
        response.outcomes,
        vec![TickOutcome::TurnEnded {
            team: Team::Blue,
            reason: TurnEndReason::Skipped
        }]
    );
    assert_eq!(response.game.phase, GamePhase::RedClue);
}

#[tokio::test]
async fn test_rule_violations_commit_nothing() {
    let setup = TestSetup::new();
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;

    let err = setup
        .game_manager
        .submit_action(
            game_id,
            players.blue_spymaster,
            PlayerAction::GiveClue {
                word: SAFE_CLUE.to_string(),
                count: 1,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::Game(GameError::WrongTurn { team: Team::Blue, .. })
    ));

    let board_word = setup.word_of(game_id, CardColor::Blue).await;
    let err = setup
        .game_manager
        .submit_action(
            game_id,
            players.red_spymaster,
            PlayerAction::GiveClue {
                word: board_word,
                count: 1,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::Game(GameError::WordOnBoard { .. })));

    let game = setup.load(game_id).await;
    assert_eq!(game.version, 0);
    assert_eq!(game.phase, GamePhase::RedClue);
    assert!(game.hints.is_empty());
}

#[tokio::test]
async fn test_poll_applies_timer_expiry() {
    let config = Config {
        turn_duration_seconds: 0,
        ..test_config()
    };
    let setup = TestSetup::with_config(config);
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;

    let response = setup.game_manager.poll(game_id, None).await.unwrap();

    assert_eq!(
        response.outcomes,
        vec![TickOutcome::TurnEnded {
            team: Team::Red,
            reason: TurnEndReason::TimerExpired
        }]
    );
    assert_eq!(response.game.phase, GamePhase::BlueClue);
    assert!(response.ai_error.is_none());
}

#[tokio::test]
async fn test_idle_poll_writes_nothing() {
    let setup = TestSetup::new();
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;

    let response = setup.game_manager.poll(game_id, None).await.unwrap();

    assert!(response.outcomes.is_empty());
    assert_eq!(response.game.version, 0);
}

#[tokio::test]
async fn test_game_not_found() {
    let setup = TestSetup::new();
    let missing = Uuid::new_v4();

    assert!(matches!(
        setup.game_manager.get_view(missing, None).await,
        Err(ManagerError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        setup.game_manager.poll(missing, None).await,
        Err(ManagerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_conflicts_exhaust_retries() {
    let store = Arc::new(AlwaysConflictingStore {
        inner: InMemoryGameStore::new(),
    });
    let setup = TestSetup::build(test_config(), store, ScriptedHints::default());
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;

    let err = setup
        .game_manager
        .submit_action(
            game_id,
            players.red_spymaster,
            PlayerAction::GiveClue {
                word: SAFE_CLUE.to_string(),
                count: 1,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ManagerError::StoreConflict { attempts: 3 }));
    assert!(err.is_retryable());
    assert_eq!(setup.load(game_id).await.phase, GamePhase::RedClue);
}

#[tokio::test]
async fn test_lost_race_retries_against_fresh_state() {
    let store = Arc::new(RacingStore::new());
    let setup = TestSetup::build(test_config(), store.clone(), ScriptedHints::default());
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;
    let red = setup.indices_of(game_id, CardColor::Red).await;

    setup
        .game_manager
        .submit_action(
            game_id,
            players.red_spymaster,
            PlayerAction::GiveClue {
                word: SAFE_CLUE.to_string(),
                count: 2,
            },
        )
        .await
        .unwrap();

    // Another process reveals red[1] between our load and our save
    store.race_next_save(Submission::new(
        Team::Red,
        Actor::Human(players.red_operative),
        PlayerAction::GuessCard {
            index: red[1] as usize,
        },
    ));
    let response = setup
        .game_manager
        .submit_action(
            game_id,
            players.red_operative,
            PlayerAction::GuessCard {
                index: red[0] as usize,
            },
        )
        .await
        .unwrap();

    assert_eq!(
        response.outcomes,
        vec![TickOutcome::GuessCorrect {
            index: red[0] as usize,
            remaining_guesses: 1
        }]
    );
    let game = setup.load(game_id).await;
    assert_eq!(game.version, 3);
    assert_eq!(game.moves.len(), 2);
    assert_eq!(game.remaining(Team::Red), 7);
    assert!(game.revealed_color(red[0] as usize).is_some());
    assert!(game.revealed_color(red[1] as usize).is_some());
}

#[tokio::test]
async fn test_drive_locks_are_released() {
    let setup = TestSetup::with_hints(vec![(SAFE_CLUE, 1)]);
    let players = Players::new();
    let ai_game = setup.create(red_ai_seats(&players)).await;
    let human_game = setup.create(players.seats()).await;
    setup
        .guesses
        .push(setup.indices_of(ai_game, CardColor::Red).await);

    for _ in 0..3 {
        setup.game_manager.poll(ai_game, None).await.unwrap();
        setup.game_manager.poll(human_game, None).await.unwrap();
    }

    assert_eq!(setup.load(ai_game).await.phase, GamePhase::BlueClue);
    assert_eq!(setup.game_manager.tracked_drive_locks(), 0);
}

#[tokio::test]
async fn test_events_follow_commits() {
    let setup = TestSetup::new();
    let players = Players::new();
    let game_id = setup.create(players.seats()).await;

    setup
        .game_manager
        .submit_action(
            game_id,
            players.red_spymaster,
            PlayerAction::GiveClue {
                word: SAFE_CLUE.to_string(),
                count: 1,
            },
        )
        .await
        .unwrap();
    setup
        .game_manager
        .submit_action(game_id, players.red_operative, PlayerAction::Skip)
        .await
        .unwrap();

    let events = setup.events();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], GameEvent::GameCreated { .. }));
    assert!(matches!(
        &events[1],
        GameEvent::ClueGiven { word, count: 1, .. } if word == SAFE_CLUE
    ));
    assert!(matches!(
        events[2],
        GameEvent::TurnEnded {
            team: Team::Red,
            reason: TurnEndReason::Skipped,
            ..
        }
    ));
}
