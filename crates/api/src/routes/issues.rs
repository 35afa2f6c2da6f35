//! Route definitions for the `/issues` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::issues;
use crate::state::AppState;

/// Routes mounted at `/issues`.
///
/// ```text
/// GET    /{project}    -> list
/// POST   /{project}    -> create
/// PUT    /{project}    -> update
/// DELETE /{project}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{project}",
        get(issues::list)
            .post(issues::create)
            .put(issues::update)
            .delete(issues::delete),
    )
}
