//! HTML views, static assets and the plain-text 404.

use axum::handler::HandlerWithoutStateExt;
use axum::http::StatusCode;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::state::AppState;

/// Fallback for any unmatched route.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Routes mounted at the root.
///
/// ```text
/// GET /              -> views/index.html
/// GET /{project}/    -> views/issue.html
/// GET /public/*      -> files under the public directory
/// ```
pub fn router(config: &ServerConfig) -> Router<AppState> {
    let assets = ServeDir::new(&config.public_dir).not_found_service(not_found.into_service());

    Router::new()
        .route_service("/", ServeFile::new(config.views_dir.join("index.html")))
        .route_service(
            "/{project}/",
            ServeFile::new(config.views_dir.join("issue.html")),
        )
        .nest_service("/public", assets)
}
