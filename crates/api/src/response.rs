//! Response bodies for issue writes.
//!
//! Update and delete answer with either `{ "result", "_id" }` or
//! `{ "error", "_id" }`. Both are ordinary HTTP 200 responses; the `error`
//! key is the only thing that distinguishes a failed outcome.

use serde::Serialize;
use serde_json::Value;

/// A successful write, echoing the `_id` the client sent.
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub result: &'static str,
    #[serde(rename = "_id")]
    pub id: Value,
}

/// A write that did not happen, echoing the submitted `_id`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    #[serde(rename = "_id")]
    pub id: Value,
}
