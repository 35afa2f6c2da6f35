use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use issue_tracker_core::error::CoreError;
use issue_tracker_db::StoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Every variant answers with HTTP 200. Validation failures carry a single
/// `{"error": message}` body. Identifier and store failures are forwarded
/// as the raw error, `{"name": kind, "message": text}`, which is a different
/// shape from the business outcomes the handlers return on purpose.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `issue_tracker_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure raised by the issue store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Core(CoreError::Validation(msg)) => json!({ "error": msg }),
            AppError::Core(err @ CoreError::InvalidId(_)) => {
                tracing::error!(error = %err, "Invalid issue id");
                raw_error("InvalidIdError", &err.to_string())
            }
            AppError::Store(StoreError::Database(err)) => {
                tracing::error!(error = %err, "Store error");
                raw_error(classify_sqlx_error(err), &err.to_string())
            }
        };

        (StatusCode::OK, axum::Json(body)).into_response()
    }
}

fn raw_error(name: &str, message: &str) -> Value {
    json!({
        "name": name,
        "message": message,
    })
}

/// Name the kind of a sqlx failure for the forwarded error body.
fn classify_sqlx_error(err: &sqlx::Error) -> &'static str {
    match err {
        sqlx::Error::RowNotFound => "RowNotFound",
        sqlx::Error::Database(_) => "DatabaseError",
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => "PoolError",
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) => "ConnectionError",
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => "DecodeError",
        _ => "StoreError",
    }
}
