//! Domain types and request field rules for the issue tracker.

pub mod error;
pub mod issue;
pub mod types;
