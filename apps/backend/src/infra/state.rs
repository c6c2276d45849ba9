use std::sync::Arc;

use actix::Actor;
use parking_lot::Mutex;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::db;
use crate::render::ColorScheme;
use crate::repos::games::{GameStore, MemoryGameStore, SeaGameStore};
use crate::session::{Session, SharedSession};
use crate::state::app_state::AppState;
use crate::ws::BroadcastHub;

/// Builder for AppState (used in both tests and main). Must run inside an
/// actix system, since it starts the hub.
pub struct StateBuilder {
    config: AppConfig,
    store: Option<Arc<dyn GameStore>>,
    session: Option<Session>,
}

impl StateBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: None,
            session: None,
        }
    }

    /// Use this store instead of the one `DATABASE_URL` selects.
    pub fn with_store(mut self, store: Arc<dyn GameStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Start from this session instead of a fresh game.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let store: Arc<dyn GameStore> = match (self.store, &self.config.database_url) {
            (Some(store), _) => store,
            (None, Some(url)) => Arc::new(SeaGameStore::new(db::connect(url).await?)),
            (None, None) => {
                tracing::warn!("DATABASE_URL not set; game history is kept in memory");
                Arc::new(MemoryGameStore::new())
            }
        };

        let session: SharedSession =
            Arc::new(Mutex::new(self.session.unwrap_or_else(Session::start)));
        let hub = BroadcastHub::new(session.clone(), ColorScheme::default()).start();

        Ok(AppState::new(self.config, session, hub, store))
    }
}

pub fn build_state(config: AppConfig) -> StateBuilder {
    StateBuilder::new(config)
}
