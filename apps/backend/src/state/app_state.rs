use std::sync::Arc;

use actix::Addr;

use crate::config::AppConfig;
use crate::repos::games::GameStore;
use crate::session::SharedSession;
use crate::ws::BroadcastHub;

/// Application state shared by every HTTP worker.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    session: SharedSession,
    hub: Addr<BroadcastHub>,
    store: Arc<dyn GameStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        session: SharedSession,
        hub: Addr<BroadcastHub>,
        store: Arc<dyn GameStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            session,
            hub,
            store,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn hub(&self) -> &Addr<BroadcastHub> {
        &self.hub
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }
}
