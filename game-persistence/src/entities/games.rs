use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub phase: String,
    #[sea_orm(column_type = "Text")]
    pub board: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub active_clue: Option<String>,
    pub remaining_guesses: Option<i32>,
    pub turn_started_at: DateTimeUtc,
    pub turn_duration_seconds: i32,
    pub winner: Option<String>,
    pub end_reason: Option<String>,
    pub red_spymaster: String,
    pub red_operative: String,
    pub blue_spymaster: String,
    pub blue_operative: String,
    pub version: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_moves::Entity")]
    GameMoves,
    #[sea_orm(has_many = "super::game_hints::Entity")]
    GameHints,
}

impl Related<super::game_moves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameMoves.def()
    }
}

impl Related<super::game_hints::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameHints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
