use actix_cors::Cors;
use actix_web::http::header;

/// Read-only API plus a WebSocket upgrade: GET is all a browser needs.
/// `None` (no `ARENA_CORS_ORIGINS`) admits any origin.
pub fn cors_middleware(origins: Option<&[String]>) -> Cors {
    let base = Cors::default()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .block_on_origin_mismatch(true)
        .max_age(3600);

    match origins {
        None => base.allow_any_origin(),
        Some(origins) => origins
            .iter()
            .filter(|o| o.starts_with("http://") || o.starts_with("https://"))
            .fold(base, |cors, origin| cors.allowed_origin(origin)),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, init_service, TestRequest};
    use actix_web::{web, App, HttpResponse};

    use super::*;

    async fn status_for(origins: Option<&[String]>, origin: &str) -> (StatusCode, bool) {
        let app = init_service(
            App::new()
                .wrap(cors_middleware(origins))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let req = TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let resp = call_service(&app, req).await;
        let allowed = resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN);
        (resp.status(), allowed)
    }

    #[actix_web::test]
    async fn any_origin_when_unconfigured() {
        let (status, allowed) = status_for(None, "http://viewer.test").await;
        assert_eq!(status, StatusCode::OK);
        assert!(allowed);
    }

    #[actix_web::test]
    async fn listed_origins_only() {
        let origins = vec!["http://a.test".to_string()];
        let (_, allowed) = status_for(Some(&origins), "http://a.test").await;
        assert!(allowed);
        let (status, allowed) = status_for(Some(&origins), "http://b.test").await;
        assert!(status.is_client_error());
        assert!(!allowed);
    }
}
