//! Repository for the `issues` table.

use async_trait::async_trait;
use issue_tracker_core::issue::{IssueChanges, IssueFilter, NewIssue};
use issue_tracker_core::types::{new_issue_id, IssueId};
use sqlx::PgPool;

use crate::models::issue::Issue;
use crate::store::{IssueStore, StoreError};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, project, issue_title, issue_text, created_by, \
    assigned_to, status_text, open, created_on, updated_on";

/// Provides CRUD operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// Insert a new issue, returning the created row.
    ///
    /// `open`, `created_on` and `updated_on` come from column defaults, so
    /// both timestamps share the statement's `NOW()`.
    pub async fn create(pool: &PgPool, input: &NewIssue) -> Result<Issue, sqlx::Error> {
        let query = format!(
            "INSERT INTO issues \
                (id, project, issue_title, issue_text, created_by, assigned_to, status_text) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(new_issue_id())
            .bind(&input.project)
            .bind(&input.issue_title)
            .bind(&input.issue_text)
            .bind(&input.created_by)
            .bind(&input.assigned_to)
            .bind(&input.status_text)
            .fetch_one(pool)
            .await
    }

    /// Find an issue by id in any project.
    pub async fn find_by_id(pool: &PgPool, id: IssueId) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues WHERE id = $1");
        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List issues matching a filter, ordered oldest first.
    pub async fn list_filtered(pool: &PgPool, filter: &IssueFilter) -> Result<Vec<Issue>, sqlx::Error> {
        let mut conditions: Vec<String> = vec!["project = $1".to_string()];
        let mut param_idx: usize = 2;

        let mut push = |column: &str, present: bool| {
            if present {
                conditions.push(format!("{column} = ${param_idx}"));
                param_idx += 1;
            }
        };
        push("id", filter.id.is_some());
        push("issue_title", filter.issue_title.is_some());
        push("issue_text", filter.issue_text.is_some());
        push("created_by", filter.created_by.is_some());
        push("assigned_to", filter.assigned_to.is_some());
        push("open", filter.open.is_some());

        let query = format!(
            "SELECT {COLUMNS} FROM issues WHERE {} ORDER BY created_on ASC, id ASC",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_as::<_, Issue>(&query).bind(&filter.project);

        if let Some(id) = filter.id {
            q = q.bind(id);
        }
        for text in [
            &filter.issue_title,
            &filter.issue_text,
            &filter.created_by,
            &filter.assigned_to,
        ]
        .into_iter()
        .flatten()
        {
            q = q.bind(text);
        }
        if let Some(open) = filter.open {
            q = q.bind(open);
        }

        q.fetch_all(pool).await
    }

    /// Update an issue. Only `Some` fields in `changes` are applied and
    /// `updated_on` is always refreshed.
    ///
    /// Returns `true` if a row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: IssueId, changes: &IssueChanges) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE issues SET
                issue_title = COALESCE($2, issue_title),
                issue_text = COALESCE($3, issue_text),
                created_by = COALESCE($4, created_by),
                assigned_to = COALESCE($5, assigned_to),
                status_text = COALESCE($6, status_text),
                open = COALESCE($7, open),
                updated_on = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&changes.issue_title)
        .bind(&changes.issue_text)
        .bind(&changes.created_by)
        .bind(&changes.assigned_to)
        .bind(&changes.status_text)
        .bind(changes.open)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete an issue by id. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: IssueId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// [`IssueStore`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgIssueStore {
    pool: PgPool,
}

impl PgIssueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueStore for PgIssueStore {
    async fn find(&self, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError> {
        Ok(IssueRepo::list_filtered(&self.pool, filter).await?)
    }

    async fn insert(&self, issue: &NewIssue) -> Result<Issue, StoreError> {
        Ok(IssueRepo::create(&self.pool, issue).await?)
    }

    async fn update(&self, id: IssueId, changes: &IssueChanges) -> Result<bool, StoreError> {
        Ok(IssueRepo::update(&self.pool, id, changes).await?)
    }

    async fn delete(&self, id: IssueId) -> Result<bool, StoreError> {
        Ok(IssueRepo::hard_delete(&self.pool, id).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
