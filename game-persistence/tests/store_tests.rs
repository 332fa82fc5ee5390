use chrono::{DateTime, TimeZone, Utc};
use game_core::{Board, Game, Submission, WordBank};
use game_persistence::{
    GameRepository, GameStore, InMemoryGameStore, StoreError, connect_and_migrate,
};
use game_types::{Actor, CardColor, PlayerAction, SeatAssignments, SeatOccupant, Team};
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn create_test_game(player_id: Uuid, seed: u64) -> Game {
    let mut rng = StdRng::seed_from_u64(seed);
    let board = Board::generate(&WordBank::default(), &mut rng).unwrap();
    let seats = SeatAssignments {
        red_spymaster: SeatOccupant::Ai {
            model_id: "gpt-4o".to_string(),
        },
        red_operative: SeatOccupant::Human { player_id },
        blue_spymaster: SeatOccupant::Ai {
            model_id: "gpt-4o".to_string(),
        },
        blue_operative: SeatOccupant::Ai {
            model_id: "gpt-4o-mini".to_string(),
        },
    };
    Game::new(Uuid::new_v4(), board, seats, 180, start_time())
}

async fn sqlite_store() -> GameRepository {
    let db = connect_and_migrate("sqlite::memory:").await.unwrap();
    GameRepository::new(db)
}

/// Applies a clue and one correct guess, then saves
async fn play_one_guess(store: &dyn GameStore, game: &mut Game, player_id: Uuid) {
    let clue = Submission::new(
        Team::Red,
        Actor::Ai("gpt-4o".to_string()),
        PlayerAction::GiveClue {
            word: "zeppelin".to_string(),
            count: 1,
        },
    )
    .with_reasoning(Some("airships".to_string()));
    game.tick(Some(clue), start_time() + chrono::Duration::seconds(1))
        .unwrap();
    game.version = store.save_game(game).await.unwrap();

    let index = game
        .board
        .cards()
        .iter()
        .find(|c| c.color == CardColor::Red)
        .unwrap()
        .index;
    let guess = Submission::new(
        Team::Red,
        Actor::Human(player_id),
        PlayerAction::GuessCard { index },
    );
    game.tick(Some(guess), start_time() + chrono::Duration::seconds(2))
        .unwrap();
    game.version = store.save_game(game).await.unwrap();
}

async fn check_store_contract(store: &dyn GameStore) {
    let player_id = Uuid::new_v4();
    let mut game = create_test_game(player_id, 3);

    store.create_game(&game).await.unwrap();
    assert!(matches!(
        store.create_game(&game).await,
        Err(StoreError::AlreadyExists(_))
    ));

    let stale = store.load_game(game.id).await.unwrap();
    play_one_guess(store, &mut game, player_id).await;
    assert_eq!(game.version, 2);

    let loaded = store.load_game(game.id).await.unwrap();
    assert_eq!(loaded, game);

    let moves = store.moves(game.id).await.unwrap();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].by_player, player_id.to_string());

    let hints = store.hints(game.id).await.unwrap();
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].word, "ZEPPELIN");
    assert_eq!(hints[0].reasoning.as_deref(), Some("airships"));

    // A writer holding an old copy loses
    match store.save_game(&stale).await {
        Err(StoreError::Conflict { expected, actual }) => {
            assert_eq!(expected, 0);
            assert_eq!(actual, 2);
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(store.load_game(game.id).await.unwrap(), game);

    let summaries = store.list_games_for_player(player_id).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, game.id);
    assert!(store
        .list_games_for_player(Uuid::new_v4())
        .await
        .unwrap()
        .is_empty());

    assert!(matches!(
        store.load_game(Uuid::new_v4()).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_in_memory_store_contract() {
    let store = InMemoryGameStore::new();
    check_store_contract(&store).await;
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_sqlite_store_contract() {
    let store = sqlite_store().await;
    check_store_contract(&store).await;
}
