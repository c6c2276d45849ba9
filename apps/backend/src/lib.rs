#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod entities;
pub mod error;
pub mod infra;
pub mod middleware;
pub mod render;
pub mod repos;
pub mod routes;
pub mod rules;
pub mod session;
pub mod state;
pub mod ws;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::AppConfig;
pub use error::AppError;
pub use infra::state::{build_state, StateBuilder};
pub use session::{MoveLoop, Session, SharedSession};
pub use state::app_state::AppState;
pub use ws::BroadcastHub;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
