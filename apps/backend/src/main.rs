use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use arena::ai::{MoveAcquirer, ProviderRegistry};
use arena::middleware::cors::cors_middleware;
use arena::middleware::request_log::RequestLog;
use arena::{build_state, routes, AppConfig, MoveLoop};
use tokio_util::sync::CancellationToken;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env is normal outside local development.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let providers = match ProviderRegistry::from_config(&config) {
        Ok(providers) => providers,
        Err(e) => {
            eprintln!("❌ Failed to set up move providers: {e}");
            std::process::exit(1);
        }
    };
    let acquirer = Arc::new(MoveAcquirer::new(providers, config.provider_timeout));

    let app_state = match build_state(config.clone()).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let shutdown = CancellationToken::new();
    let move_loop = MoveLoop::new(
        app_state.session().clone(),
        acquirer,
        app_state.hub().clone(),
        app_state.store().clone(),
        config.move_interval,
    )
    .spawn(shutdown.clone());

    let (host, port) = config.bind_addr();
    println!("🚀 Starting chess arena on http://{host}:{port}");

    let data = web::Data::new(app_state);
    let cors_origins = config.cors_origins.clone();

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(cors_origins.as_deref()))
            .wrap(RequestLog)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    shutdown.cancel();
    if let Err(e) = move_loop.await {
        tracing::error!(error = %e, "move loop task failed");
    }

    result
}
