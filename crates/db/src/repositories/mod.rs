pub mod issue_repo;

pub use issue_repo::{IssueRepo, PgIssueStore};
