//! Issue entity model.

use issue_tracker_core::types::{IssueId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `issues` table.
///
/// Serializes with the id under `_id` and without `project`, which is the
/// shape every API response uses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Issue {
    #[serde(rename = "_id")]
    pub id: IssueId,
    #[serde(skip_serializing)]
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub open: bool,
    pub created_on: Timestamp,
    pub updated_on: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_issue_hides_project_and_renames_id() {
        let now = chrono::Utc::now();
        let issue = Issue {
            id: issue_tracker_core::types::new_issue_id(),
            project: "secret".into(),
            issue_title: "t".into(),
            issue_text: "x".into(),
            created_by: "me".into(),
            assigned_to: String::new(),
            status_text: String::new(),
            open: true,
            created_on: now,
            updated_on: now,
        };

        let json = serde_json::to_value(&issue).unwrap();
        assert!(json.get("project").is_none());
        assert!(json.get("id").is_none());
        assert_eq!(json["_id"], issue.id.to_string());
        assert_eq!(json["open"], true);
        assert!(json["created_on"].is_string());
    }
}
