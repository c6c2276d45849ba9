//! Finished-game history: append once per completed session, list newest first.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, NotSet,
    QueryOrder, Set,
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::entities::games;
use crate::error::AppError;

/// A completed game, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGameRecord {
    pub white_player: String,
    pub black_player: String,
    pub winner: Option<String>,
    /// PGN result token.
    pub outcome: String,
    pub started_at: OffsetDateTime,
    pub ended_at: OffsetDateTime,
    /// Plies played.
    pub total_moves: i32,
    pub pgn: String,
}

/// A stored game as served by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub id: i64,
    pub white_player: String,
    pub black_player: String,
    pub winner: Option<String>,
    pub outcome: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub ended_at: OffsetDateTime,
    pub total_moves: i32,
    pub pgn: String,
}

impl From<games::Model> for GameRecord {
    fn from(model: games::Model) -> Self {
        Self {
            id: model.id,
            white_player: model.white_player,
            black_player: model.black_player,
            winner: model.winner,
            outcome: model.outcome,
            started_at: model.started_at,
            ended_at: model.ended_at,
            total_moves: model.total_moves,
            pgn: model.pgn,
        }
    }
}

#[async_trait]
pub trait GameStore: Send + Sync {
    async fn append(&self, game: NewGameRecord) -> Result<GameRecord, AppError>;

    /// All stored games, most recent first.
    async fn list(&self) -> Result<Vec<GameRecord>, AppError>;

    async fn find(&self, id: i64) -> Result<Option<GameRecord>, AppError>;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;

    /// Latest applied schema migration, for stores that have a schema.
    async fn schema_version(&self) -> Result<Option<String>, AppError> {
        Ok(None)
    }
}

pub struct SeaGameStore {
    db: DatabaseConnection,
}

impl SeaGameStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GameStore for SeaGameStore {
    async fn append(&self, game: NewGameRecord) -> Result<GameRecord, AppError> {
        let active = games::ActiveModel {
            id: NotSet,
            white_player: Set(game.white_player),
            black_player: Set(game.black_player),
            winner: Set(game.winner),
            outcome: Set(game.outcome),
            started_at: Set(game.started_at),
            ended_at: Set(game.ended_at),
            total_moves: Set(game.total_moves),
            pgn: Set(game.pgn),
        };
        let model = active.insert(&self.db).await?;
        Ok(model.into())
    }

    async fn list(&self) -> Result<Vec<GameRecord>, AppError> {
        let rows = games::Entity::find()
            .order_by_desc(games::Column::StartedAt)
            .order_by_desc(games::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(GameRecord::from).collect())
    }

    async fn find(&self, id: i64) -> Result<Option<GameRecord>, AppError> {
        let row = games::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(GameRecord::from))
    }

    fn backend(&self) -> &'static str {
        match self.db.get_database_backend() {
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::Sqlite => "sqlite",
            DatabaseBackend::MySql => "mysql",
        }
    }

    async fn schema_version(&self) -> Result<Option<String>, AppError> {
        Ok(migration::get_latest_migration_version(&self.db).await?)
    }
}

/// Games kept by [`MemoryGameStore::new`].
pub const MEMORY_HISTORY_LIMIT: usize = 1000;

/// Process-local history, used when no database is configured. Keeps only the
/// most recently stored `limit` games; ids keep counting across evictions.
pub struct MemoryGameStore {
    inner: Mutex<MemoryHistory>,
    limit: usize,
}

struct MemoryHistory {
    games: VecDeque<GameRecord>,
    next_id: i64,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::with_limit(MEMORY_HISTORY_LIMIT)
    }

    /// `limit` is clamped to at least one game.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            inner: Mutex::new(MemoryHistory {
                games: VecDeque::new(),
                next_id: 1,
            }),
            limit: limit.max(1),
        }
    }
}

impl Default for MemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn append(&self, game: NewGameRecord) -> Result<GameRecord, AppError> {
        let mut history = self.inner.lock();
        let record = GameRecord {
            id: history.next_id,
            white_player: game.white_player,
            black_player: game.black_player,
            winner: game.winner,
            outcome: game.outcome,
            started_at: game.started_at,
            ended_at: game.ended_at,
            total_moves: game.total_moves,
            pgn: game.pgn,
        };
        history.next_id += 1;
        history.games.push_back(record.clone());
        while history.games.len() > self.limit {
            history.games.pop_front();
        }
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<GameRecord>, AppError> {
        let mut games: Vec<GameRecord> = self.inner.lock().games.iter().cloned().collect();
        games.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(b.id.cmp(&a.id)));
        Ok(games)
    }

    async fn find(&self, id: i64) -> Result<Option<GameRecord>, AppError> {
        Ok(self.inner.lock().games.iter().find(|g| g.id == id).cloned())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::infra::db;

    fn record(white: &str, started_at: OffsetDateTime) -> NewGameRecord {
        NewGameRecord {
            white_player: white.to_string(),
            black_player: "Claude".to_string(),
            winner: None,
            outcome: "1/2-1/2".to_string(),
            started_at,
            ended_at: started_at + time::Duration::minutes(5),
            total_moves: 42,
            pgn: "1. e4 e5 1/2-1/2".to_string(),
        }
    }

    async fn exercise(store: &dyn GameStore) {
        assert!(store.list().await.unwrap().is_empty());

        let older = store
            .append(record("ChatGPT", datetime!(2025-01-01 10:00 UTC)))
            .await
            .unwrap();
        let newer = store
            .append(NewGameRecord {
                winner: Some("ChatGPT".to_string()),
                outcome: "1-0".to_string(),
                ..record("ChatGPT", datetime!(2025-01-02 10:00 UTC))
            })
            .await
            .unwrap();
        assert_ne!(older.id, newer.id);

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], newer);
        assert_eq!(listed[1], older);
        assert_eq!(listed[0].winner.as_deref(), Some("ChatGPT"));
        assert_eq!(listed[1].winner, None);

        assert_eq!(store.find(older.id).await.unwrap(), Some(older));
        assert_eq!(store.find(9999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_lists_newest_first() {
        let store = MemoryGameStore::new();
        exercise(&store).await;
        assert_eq!(store.backend(), "memory");
        assert_eq!(store.schema_version().await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_keeps_only_the_most_recent_games() {
        let store = MemoryGameStore::with_limit(2);
        let mut ids = Vec::new();
        for day in 1..=3u8 {
            let started = datetime!(2025-01-01 10:00 UTC) + time::Duration::days(day.into());
            ids.push(store.append(record("Claude", started)).await.unwrap().id);
        }
        assert_eq!(ids, vec![1, 2, 3]);

        let listed: Vec<i64> = store.list().await.unwrap().iter().map(|g| g.id).collect();
        assert_eq!(listed, vec![3, 2]);
        assert_eq!(store.find(1).await.unwrap(), None);

        let next = store
            .append(record("Claude", datetime!(2025-02-01 10:00 UTC)))
            .await
            .unwrap();
        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn sea_store_round_trips_through_sqlite() {
        let conn = db::connect("sqlite::memory:").await.unwrap();
        let store = SeaGameStore::new(conn);
        exercise(&store).await;
        assert_eq!(store.backend(), "sqlite");
        assert_eq!(
            store.schema_version().await.unwrap().as_deref(),
            Some("m20251019_000001_games")
        );
    }

    #[test]
    fn records_serialize_with_rfc3339_timestamps() {
        let rec = GameRecord {
            id: 1,
            white_player: "Claude".to_string(),
            black_player: "ChatGPT".to_string(),
            winner: None,
            outcome: "1/2-1/2".to_string(),
            started_at: datetime!(2025-01-01 10:00 UTC),
            ended_at: datetime!(2025-01-01 10:05 UTC),
            total_moves: 10,
            pgn: String::new(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["started_at"], "2025-01-01T10:00:00Z");
        assert_eq!(json["winner"], serde_json::Value::Null);
    }
}
