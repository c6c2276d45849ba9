//! Finished-game history routes.

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::state::app_state::AppState;

/// GET /api/games
///
/// Every stored game, most recent first.
async fn list_games(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let games = app_state.store().list().await?;
    Ok(HttpResponse::Ok().json(games))
}

/// GET /api/games/{id}
async fn get_game(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let game = app_state
        .store()
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("GAME_NOT_FOUND", format!("Game with ID {id} not found")))?;
    Ok(HttpResponse::Ok().json(game))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_games))
        .route("/{id}", web::get().to(get_game));
}
