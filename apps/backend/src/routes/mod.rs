use actix_web::web;

pub mod games;
pub mod health;
pub mod realtime;

/// Register every HTTP route. Used by `main.rs` and by the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Game history: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));

    // Spectator channel: /ws
    cfg.configure(realtime::configure_routes);
}
