use std::net::TcpListener;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use arena::routes;
use arena::{AppConfig, AppState};

/// Defaults with no providers, no database and a small viewer queue.
pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "ARENA_VIEWER_QUEUE" => Some("16".to_string()),
        _ => None,
    })
    .expect("test config parses")
}

/// Serve the full route table on an ephemeral port.
pub fn start_test_server(
    state: AppState,
) -> Result<(ServerHandle, std::net::SocketAddr), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((handle, addr))
}
