use async_trait::async_trait;
use game_core::{Board, Game};
use game_types::{
    CardColor, Clue, EndReason, GameId, GamePhase, GameSummary, Hint, Move, PlayerId,
    SeatAssignments, SeatOccupant, Team, TurnTimer,
};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::{game_hints, game_moves, games, prelude::*};
use crate::store::{GameStore, StoreError};

/// SQL-backed store. Moves and hints live in their own append-only tables.
pub struct GameRepository {
    db: DatabaseConnection,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn game_to_active_model(game: &Game) -> Result<games::ActiveModel, StoreError> {
        let active_clue = game
            .active_clue
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        Ok(games::ActiveModel {
            id: Set(game.id.to_string()),
            phase: Set(game.phase.as_str().to_string()),
            board: Set(serde_json::to_string(&game.board)?),
            active_clue: Set(active_clue),
            remaining_guesses: Set(game.remaining_guesses.map(|n| n as i32)),
            turn_started_at: Set(game.turn_timer.started_at),
            turn_duration_seconds: Set(game.turn_timer.duration_seconds as i32),
            winner: Set(game.winner.map(|team| team.as_str().to_string())),
            end_reason: Set(game.end_reason.map(|reason| reason.as_str().to_string())),
            red_spymaster: Set(game.seats.red_spymaster.tag()),
            red_operative: Set(game.seats.red_operative.tag()),
            blue_spymaster: Set(game.seats.blue_spymaster.tag()),
            blue_operative: Set(game.seats.blue_operative.tag()),
            version: Set(game.version as i64),
            created_at: Set(game.created_at),
            updated_at: Set(game.updated_at),
            completed_at: Set(game.completed_at),
        })
    }

    fn model_to_seats(model: &games::Model) -> Result<SeatAssignments, StoreError> {
        let seat = |tag: &str| {
            SeatOccupant::from_tag(tag)
                .ok_or_else(|| StoreError::Corrupt(format!("unreadable seat '{}'", tag)))
        };

        Ok(SeatAssignments {
            red_spymaster: seat(&model.red_spymaster)?,
            red_operative: seat(&model.red_operative)?,
            blue_spymaster: seat(&model.blue_spymaster)?,
            blue_operative: seat(&model.blue_operative)?,
        })
    }

    fn model_to_summary(model: &games::Model) -> Result<GameSummary, StoreError> {
        Ok(GameSummary {
            id: parse_id(&model.id)?,
            phase: parse_phase(&model.phase)?,
            winner: model.winner.as_deref().map(parse_team).transpose()?,
            seats: Self::model_to_seats(model)?,
            created_at: model.created_at,
            completed_at: model.completed_at,
        })
    }

    fn model_to_game(
        model: games::Model,
        moves: Vec<game_moves::Model>,
        hints: Vec<game_hints::Model>,
    ) -> Result<Game, StoreError> {
        let board: Board = serde_json::from_str(&model.board)?;
        let active_clue: Option<Clue> = model
            .active_clue
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let end_reason = match model.end_reason.as_deref() {
            Some(value) => Some(EndReason::parse(value).ok_or_else(|| {
                StoreError::Corrupt(format!("unknown end reason '{}'", value))
            })?),
            None => None,
        };

        Ok(Game {
            id: parse_id(&model.id)?,
            phase: parse_phase(&model.phase)?,
            board,
            active_clue,
            remaining_guesses: model.remaining_guesses.map(|n| n.max(0) as u32),
            turn_timer: TurnTimer::start(
                model.turn_started_at,
                model.turn_duration_seconds.max(0) as u32,
            ),
            moves: moves
                .into_iter()
                .map(Self::model_to_move)
                .collect::<Result<_, _>>()?,
            hints: hints
                .into_iter()
                .map(Self::model_to_hint)
                .collect::<Result<_, _>>()?,
            winner: model.winner.as_deref().map(parse_team).transpose()?,
            end_reason,
            seats: Self::model_to_seats(&model)?,
            version: model.version.max(0) as u64,
            created_at: model.created_at,
            updated_at: model.updated_at,
            completed_at: model.completed_at,
        })
    }

    fn model_to_move(model: game_moves::Model) -> Result<Move, StoreError> {
        let color = CardColor::parse(&model.color)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown color '{}'", model.color)))?;

        Ok(Move {
            team: parse_team(&model.team)?,
            index: model.card_index.max(0) as usize,
            color,
            by_player: model.by_player,
            timestamp: model.created_at,
        })
    }

    fn model_to_hint(model: game_hints::Model) -> Result<Hint, StoreError> {
        Ok(Hint {
            team: parse_team(&model.team)?,
            word: model.word,
            count: model.count.max(0) as u32,
            by_player: model.by_player,
            reasoning: model.reasoning,
            issued_at: model.created_at,
        })
    }

    /// Insert the tail of the move and hint histories the database has not seen yet
    async fn append_history<C: ConnectionTrait>(conn: &C, game: &Game) -> Result<(), StoreError> {
        let game_id = game.id.to_string();

        let persisted_moves = GameMoves::find()
            .filter(game_moves::Column::GameId.eq(game_id.clone()))
            .count(conn)
            .await? as usize;

        if game.moves.len() > persisted_moves {
            let new_moves = game.moves[persisted_moves..]
                .iter()
                .enumerate()
                .map(|(offset, m)| game_moves::ActiveModel {
                    id: NotSet,
                    game_id: Set(game_id.clone()),
                    seq: Set((persisted_moves + offset) as i32),
                    team: Set(m.team.as_str().to_string()),
                    card_index: Set(m.index as i32),
                    color: Set(m.color.as_str().to_string()),
                    by_player: Set(m.by_player.clone()),
                    created_at: Set(m.timestamp),
                });
            GameMoves::insert_many(new_moves).exec(conn).await?;
        }

        let persisted_hints = GameHints::find()
            .filter(game_hints::Column::GameId.eq(game_id.clone()))
            .count(conn)
            .await? as usize;

        if game.hints.len() > persisted_hints {
            let new_hints = game.hints[persisted_hints..]
                .iter()
                .enumerate()
                .map(|(offset, hint)| game_hints::ActiveModel {
                    id: NotSet,
                    game_id: Set(game_id.clone()),
                    seq: Set((persisted_hints + offset) as i32),
                    team: Set(hint.team.as_str().to_string()),
                    word: Set(hint.word.clone()),
                    count: Set(hint.count as i32),
                    by_player: Set(hint.by_player.clone()),
                    reasoning: Set(hint.reasoning.clone()),
                    created_at: Set(hint.issued_at),
                });
            GameHints::insert_many(new_hints).exec(conn).await?;
        }

        Ok(())
    }

    async fn find_game_model<C: ConnectionTrait>(
        conn: &C,
        id: GameId,
    ) -> Result<games::Model, StoreError> {
        Games::find_by_id(id.to_string())
            .one(conn)
            .await?
            .ok_or(StoreError::NotFound(id))
    }
}

#[async_trait]
impl GameStore for GameRepository {
    async fn create_game(&self, game: &Game) -> Result<GameId, StoreError> {
        let txn = self.db.begin().await?;

        if Games::find_by_id(game.id.to_string())
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(StoreError::AlreadyExists(game.id));
        }

        Games::insert(Self::game_to_active_model(game)?)
            .exec(&txn)
            .await?;
        Self::append_history(&txn, game).await?;
        txn.commit().await?;

        debug!(game_id = %game.id, "Created game");
        Ok(game.id)
    }

    async fn load_game(&self, id: GameId) -> Result<Game, StoreError> {
        let model = Self::find_game_model(&self.db, id).await?;

        let moves = GameMoves::find()
            .filter(game_moves::Column::GameId.eq(model.id.clone()))
            .order_by_asc(game_moves::Column::Seq)
            .all(&self.db)
            .await?;

        let hints = GameHints::find()
            .filter(game_hints::Column::GameId.eq(model.id.clone()))
            .order_by_asc(game_hints::Column::Seq)
            .all(&self.db)
            .await?;

        Self::model_to_game(model, moves, hints)
    }

    async fn save_game(&self, game: &Game) -> Result<u64, StoreError> {
        let expected = game.version;
        let next_version = expected + 1;

        let mut update = Self::game_to_active_model(game)?;
        update.id = NotSet;
        update.created_at = NotSet;
        update.version = Set(next_version as i64);

        let txn = self.db.begin().await?;

        let result = Games::update_many()
            .set(update)
            .filter(games::Column::Id.eq(game.id.to_string()))
            .filter(games::Column::Version.eq(expected as i64))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            // Missing row or a concurrent writer got there first
            let current = Self::find_game_model(&txn, game.id).await?;
            warn!(
                game_id = %game.id,
                expected,
                actual = current.version,
                "Optimistic lock conflict"
            );
            return Err(StoreError::Conflict {
                expected,
                actual: current.version.max(0) as u64,
            });
        }

        Self::append_history(&txn, game).await?;
        txn.commit().await?;

        debug!(game_id = %game.id, version = next_version, "Saved game");
        Ok(next_version)
    }

    async fn moves(&self, id: GameId) -> Result<Vec<Move>, StoreError> {
        Self::find_game_model(&self.db, id).await?;

        GameMoves::find()
            .filter(game_moves::Column::GameId.eq(id.to_string()))
            .order_by_asc(game_moves::Column::Seq)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::model_to_move)
            .collect()
    }

    async fn hints(&self, id: GameId) -> Result<Vec<Hint>, StoreError> {
        Self::find_game_model(&self.db, id).await?;

        GameHints::find()
            .filter(game_hints::Column::GameId.eq(id.to_string()))
            .order_by_asc(game_hints::Column::Seq)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::model_to_hint)
            .collect()
    }

    async fn list_games_for_player(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<GameSummary>, StoreError> {
        let tag = player_id.to_string();

        Games::find()
            .filter(
                Condition::any()
                    .add(games::Column::RedSpymaster.eq(tag.clone()))
                    .add(games::Column::RedOperative.eq(tag.clone()))
                    .add(games::Column::BlueSpymaster.eq(tag.clone()))
                    .add(games::Column::BlueOperative.eq(tag)),
            )
            .order_by_desc(games::Column::CreatedAt)
            .all(&self.db)
            .await?
            .iter()
            .map(Self::model_to_summary)
            .collect()
    }
}

fn parse_id(value: &str) -> Result<GameId, StoreError> {
    Uuid::parse_str(value).map_err(|_| StoreError::Corrupt(format!("bad game id '{}'", value)))
}

fn parse_phase(value: &str) -> Result<GamePhase, StoreError> {
    GamePhase::parse(value).ok_or_else(|| StoreError::Corrupt(format!("unknown phase '{}'", value)))
}

fn parse_team(value: &str) -> Result<Team, StoreError> {
    Team::parse(value).ok_or_else(|| StoreError::Corrupt(format!("unknown team '{}'", value)))
}
