//! In-memory issue store.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! Every operation takes the lock once, so each call is atomic with respect
//! to the others, matching the single-statement guarantees of the
//! PostgreSQL store.

use async_trait::async_trait;
use chrono::Utc;
use issue_tracker_core::issue::{IssueChanges, IssueFilter, NewIssue};
use issue_tracker_core::types::{new_issue_id, IssueId, Timestamp};
use tokio::sync::RwLock;

use crate::models::issue::Issue;
use crate::store::{IssueStore, StoreError};

/// Issues held in insertion order behind a `tokio` lock.
#[derive(Debug, Default)]
pub struct MemoryIssueStore {
    issues: RwLock<Vec<Issue>>,
}

impl MemoryIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored issues across all projects.
    pub async fn len(&self) -> usize {
        self.issues.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.issues.read().await.is_empty()
    }
}

fn matches(issue: &Issue, filter: &IssueFilter) -> bool {
    fn text_matches(value: &str, wanted: &Option<String>) -> bool {
        wanted.as_deref().map_or(true, |w| w == value)
    }

    issue.project == filter.project
        && filter.id.map_or(true, |id| id == issue.id)
        && text_matches(&issue.issue_title, &filter.issue_title)
        && text_matches(&issue.issue_text, &filter.issue_text)
        && text_matches(&issue.created_by, &filter.created_by)
        && text_matches(&issue.assigned_to, &filter.assigned_to)
        && filter.open.map_or(true, |open| open == issue.open)
}

fn apply(issue: &mut Issue, changes: &IssueChanges, now: Timestamp) {
    let fields = [
        (&mut issue.issue_title, &changes.issue_title),
        (&mut issue.issue_text, &changes.issue_text),
        (&mut issue.created_by, &changes.created_by),
        (&mut issue.assigned_to, &changes.assigned_to),
        (&mut issue.status_text, &changes.status_text),
    ];
    for (slot, change) in fields {
        if let Some(value) = change {
            slot.clone_from(value);
        }
    }
    if let Some(open) = changes.open {
        issue.open = open;
    }
    issue.updated_on = now;
}

#[async_trait]
impl IssueStore for MemoryIssueStore {
    async fn find(&self, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError> {
        let issues = self.issues.read().await;
        let mut found: Vec<Issue> = issues.iter().filter(|i| matches(i, filter)).cloned().collect();
        found.sort_by_key(|i| i.created_on);
        Ok(found)
    }

    async fn insert(&self, issue: &NewIssue) -> Result<Issue, StoreError> {
        let now = Utc::now();
        let created = Issue {
            id: new_issue_id(),
            project: issue.project.clone(),
            issue_title: issue.issue_title.clone(),
            issue_text: issue.issue_text.clone(),
            created_by: issue.created_by.clone(),
            assigned_to: issue.assigned_to.clone(),
            status_text: issue.status_text.clone(),
            open: true,
            created_on: now,
            updated_on: now,
        };
        self.issues.write().await.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: IssueId, changes: &IssueChanges) -> Result<bool, StoreError> {
        let mut issues = self.issues.write().await;
        match issues.iter_mut().find(|i| i.id == id) {
            Some(issue) => {
                apply(issue, changes, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: IssueId) -> Result<bool, StoreError> {
        let mut issues = self.issues.write().await;
        match issues.iter().position(|i| i.id == id) {
            Some(idx) => {
                issues.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
