//! The minimal driver interface the issues handler talks to.

use async_trait::async_trait;
use issue_tracker_core::issue::{IssueChanges, IssueFilter, NewIssue};
use issue_tracker_core::types::IssueId;

use crate::models::issue::Issue;

/// Failure raised by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A collection of issues across all projects.
///
/// Each method is a single atomic operation against the backend; callers
/// never compose them into transactions.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Issues matching every constraint in `filter`, oldest `created_on` first.
    async fn find(&self, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError>;

    /// Persist a new open issue, assigning its id and timestamps.
    async fn insert(&self, issue: &NewIssue) -> Result<Issue, StoreError>;

    /// Apply `changes` and refresh `updated_on`. Returns `false` if no issue
    /// has that id.
    async fn update(&self, id: IssueId, changes: &IssueChanges) -> Result<bool, StoreError>;

    /// Remove an issue. Returns `false` if no issue has that id.
    async fn delete(&self, id: IssueId) -> Result<bool, StoreError>;

    /// Confirm the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
