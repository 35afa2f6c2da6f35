//! Handlers for `/api/issues/{project}`.
//!
//! Validation failures and store errors surface through [`AppError`];
//! "nothing to update" and "no such issue" are ordinary responses carrying an
//! `error` key.
//!
//! [`AppError`]: crate::error::AppError

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use issue_tracker_core::issue::{
    parse_body_id, require_id, IssueChanges, IssueFilter, IssueListParams, NewIssue,
    MSG_COULD_NOT_DELETE, MSG_COULD_NOT_UPDATE, MSG_DELETED, MSG_NO_UPDATE_FIELDS, MSG_UPDATED,
};
use issue_tracker_db::models::issue::Issue;

use crate::error::AppResult;
use crate::extract::IssueBody;
use crate::response::{ErrorResponse, OutcomeResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /issues/{project}
// ---------------------------------------------------------------------------

/// List a project's issues, oldest first, narrowed by any query filters.
///
/// The query is taken as raw pairs so that repeated keys are folded into one
/// value instead of rejecting the request.
pub async fn list(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Vec<Issue>>> {
    let params = IssueListParams::from_pairs(pairs);
    let filter = IssueFilter::from_params(&project, &params)?;
    let issues = state.store.find(&filter).await?;

    tracing::debug!(project = %project, count = issues.len(), "Listed issues");

    Ok(Json(issues))
}

// ---------------------------------------------------------------------------
// POST /issues/{project}
// ---------------------------------------------------------------------------

/// Create an open issue in `project`.
pub async fn create(
    State(state): State<AppState>,
    Path(project): Path<String>,
    IssueBody(body): IssueBody,
) -> AppResult<Json<Issue>> {
    let input = NewIssue::from_body(&project, &body)?;
    let issue = state.store.insert(&input).await?;

    tracing::info!(issue_id = %issue.id, project = %project, "Issue created");

    Ok(Json(issue))
}

// ---------------------------------------------------------------------------
// PUT /issues/{project}
// ---------------------------------------------------------------------------

/// Apply the fields present in the body to the issue named by `_id`.
///
/// The match is by id alone; the path project is only logged.
pub async fn update(
    State(state): State<AppState>,
    Path(project): Path<String>,
    IssueBody(body): IssueBody,
) -> AppResult<Response> {
    let submitted = require_id(&body)?.clone();

    let changes = IssueChanges::from_body(&body);
    if changes.is_empty() {
        return Ok(Json(ErrorResponse {
            error: MSG_NO_UPDATE_FIELDS,
            id: submitted,
        })
        .into_response());
    }

    let id = parse_body_id(&submitted)?;
    if !state.store.update(id, &changes).await? {
        tracing::debug!(issue_id = %id, project = %project, "Update matched no issue");
        return Ok(Json(ErrorResponse {
            error: MSG_COULD_NOT_UPDATE,
            id: submitted,
        })
        .into_response());
    }

    tracing::info!(issue_id = %id, project = %project, "Issue updated");

    Ok(Json(OutcomeResponse {
        result: MSG_UPDATED,
        id: submitted,
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// DELETE /issues/{project}
// ---------------------------------------------------------------------------

/// Permanently remove the issue named by `_id`, in whichever project it lives.
pub async fn delete(
    State(state): State<AppState>,
    Path(project): Path<String>,
    IssueBody(body): IssueBody,
) -> AppResult<Response> {
    let submitted = require_id(&body)?.clone();
    let id = parse_body_id(&submitted)?;

    if !state.store.delete(id).await? {
        tracing::debug!(issue_id = %id, project = %project, "Delete matched no issue");
        return Ok(Json(ErrorResponse {
            error: MSG_COULD_NOT_DELETE,
            id: submitted,
        })
        .into_response());
    }

    tracing::info!(issue_id = %id, project = %project, "Issue deleted");

    Ok(Json(OutcomeResponse {
        result: MSG_DELETED,
        id: submitted,
    })
    .into_response())
}
