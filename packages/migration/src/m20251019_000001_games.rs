use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Games {
    Table,
    Id,
    WhitePlayer,
    BlackPlayer,
    Winner,
    Outcome,
    StartedAt,
    EndedAt,
    TotalMoves,
    Pgn,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::WhitePlayer).string().not_null())
                    .col(ColumnDef::new(Games::BlackPlayer).string().not_null())
                    .col(ColumnDef::new(Games::Winner).string().null())
                    .col(ColumnDef::new(Games::Outcome).string().not_null())
                    .col(
                        ColumnDef::new(Games::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::EndedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Games::TotalMoves).integer().not_null())
                    .col(ColumnDef::new(Games::Pgn).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Listing is always "most recent first".
        manager
            .create_index(
                Index::create()
                    .name("idx_games_started_at")
                    .table(Games::Table)
                    .col(Games::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}
