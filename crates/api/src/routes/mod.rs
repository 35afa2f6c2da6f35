pub mod health;
pub mod issues;
pub mod views;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /issues/{project}        GET list, POST create, PUT update, DELETE delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/issues", issues::router())
}
