//! Request body extractor for the issues resource.
//!
//! Clients send either JSON or URL-encoded forms, and the handlers need to
//! see which keys were present, not just their values. [`IssueBody`] decodes
//! both encodings into one key/value map.

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use issue_tracker_core::issue::FieldMap;
use serde_json::Value;

/// The decoded request body as a map of field name to value.
///
/// A body that is not a JSON object, or a request with an unrecognised
/// content type, decodes to an empty map.
#[derive(Debug, Clone, Default)]
pub struct IssueBody(pub FieldMap);

impl<S> FromRequest<S> for IssueBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(IssueBody(object_fields(value)))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(IssueBody(form_fields(pairs)))
        } else {
            Ok(IssueBody::default())
        }
    }
}

fn object_fields(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        _ => FieldMap::new(),
    }
}

/// Form values are always strings. The first occurrence of a repeated key wins.
fn form_fields(pairs: Vec<(String, String)>) -> FieldMap {
    let mut map = FieldMap::new();
    for (key, value) in pairs {
        map.entry(key).or_insert(Value::String(value));
    }
    map
}
