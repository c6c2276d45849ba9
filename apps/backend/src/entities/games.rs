use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One finished game.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "white_player")]
    pub white_player: String,
    #[sea_orm(column_name = "black_player")]
    pub black_player: String,
    /// `None` for a draw.
    pub winner: Option<String>,
    pub outcome: String,
    #[sea_orm(column_name = "started_at")]
    pub started_at: OffsetDateTime,
    #[sea_orm(column_name = "ended_at")]
    pub ended_at: OffsetDateTime,
    #[sea_orm(column_name = "total_moves")]
    pub total_moves: i32,
    #[sea_orm(column_type = "Text")]
    pub pgn: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
