use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::ai::PlayerId;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::ws::hub::ViewerCount;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    white: PlayerId,
    black: PlayerId,
    ply: usize,
    version: u64,
    viewers: usize,
    history: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<String>,
    time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (white, black, ply, version) = {
        let session = app_state.session().lock();
        (
            session.sides().white(),
            session.sides().black(),
            session.current_position().ply_count(),
            session.version(),
        )
    };

    let viewers = app_state
        .hub()
        .send(ViewerCount)
        .await
        .map_err(|e| AppError::internal(format!("hub unavailable: {e}")))?;

    let schema = app_state.store().schema_version().await?;

    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        white,
        black,
        ply,
        version,
        viewers,
        history: app_state.store().backend(),
        schema,
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
