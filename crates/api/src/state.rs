use std::sync::Arc;

use issue_tracker_db::IssueStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Issue store, created once at startup and shared by every request.
    pub store: Arc<dyn IssueStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
