use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Games::Phase).string().not_null())
                    .col(ColumnDef::new(Games::Board).text().not_null())
                    .col(ColumnDef::new(Games::ActiveClue).text().null())
                    .col(ColumnDef::new(Games::RemainingGuesses).integer().null())
                    .col(
                        ColumnDef::new(Games::TurnStartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::TurnDurationSeconds)
                            .integer()
                            .not_null()
                            .default(180),
                    )
                    .col(ColumnDef::new(Games::Winner).string().null())
                    .col(ColumnDef::new(Games::EndReason).string().null())
                    .col(ColumnDef::new(Games::RedSpymaster).string().not_null())
                    .col(ColumnDef::new(Games::RedOperative).string().not_null())
                    .col(ColumnDef::new(Games::BlueSpymaster).string().not_null())
                    .col(ColumnDef::new(Games::BlueOperative).string().not_null())
                    .col(
                        ColumnDef::new(Games::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Games::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GameMoves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameMoves::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameMoves::GameId).string().not_null())
                    .col(ColumnDef::new(GameMoves::Seq).integer().not_null())
                    .col(ColumnDef::new(GameMoves::Team).string().not_null())
                    .col(ColumnDef::new(GameMoves::CardIndex).integer().not_null())
                    .col(ColumnDef::new(GameMoves::Color).string().not_null())
                    .col(ColumnDef::new(GameMoves::ByPlayer).string().not_null())
                    .col(
                        ColumnDef::new(GameMoves::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_moves_game")
                            .from(GameMoves::Table, GameMoves::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GameHints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameHints::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameHints::GameId).string().not_null())
                    .col(ColumnDef::new(GameHints::Seq).integer().not_null())
                    .col(ColumnDef::new(GameHints::Team).string().not_null())
                    .col(ColumnDef::new(GameHints::Word).string().not_null())
                    .col(ColumnDef::new(GameHints::Count).integer().not_null())
                    .col(ColumnDef::new(GameHints::ByPlayer).string().not_null())
                    .col(ColumnDef::new(GameHints::Reasoning).text().null())
                    .col(
                        ColumnDef::new(GameHints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_hints_game")
                            .from(GameHints::Table, GameHints::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // History is always read per game in sequence order
        manager
            .create_index(
                Index::create()
                    .name("idx_game_moves_game_seq")
                    .table(GameMoves::Table)
                    .col(GameMoves::GameId)
                    .col(GameMoves::Seq)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_hints_game_seq")
                    .table(GameHints::Table)
                    .col(GameHints::GameId)
                    .col(GameHints::Seq)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameHints::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameMoves::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    Phase,
    Board,
    ActiveClue,
    RemainingGuesses,
    TurnStartedAt,
    TurnDurationSeconds,
    Winner,
    EndReason,
    RedSpymaster,
    RedOperative,
    BlueSpymaster,
    BlueOperative,
    Version,
    CreatedAt,
    UpdatedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum GameMoves {
    Table,
    Id,
    GameId,
    Seq,
    Team,
    CardIndex,
    Color,
    ByPlayer,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GameHints {
    Table,
    Id,
    GameId,
    Seq,
    Team,
    Word,
    Count,
    ByPlayer,
    Reasoning,
    CreatedAt,
}
