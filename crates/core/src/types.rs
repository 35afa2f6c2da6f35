use crate::error::CoreError;

/// Issue identifiers are UUIDv7, so they sort by creation time.
pub type IssueId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh issue identifier.
pub fn new_issue_id() -> IssueId {
    uuid::Uuid::now_v7()
}

/// Parse a client-supplied identifier.
pub fn parse_issue_id(raw: &str) -> Result<IssueId, CoreError> {
    raw.trim()
        .parse::<uuid::Uuid>()
        .map_err(|_| CoreError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn generated_ids_round_trip_through_parse() {
        let id = new_issue_id();
        assert_eq!(parse_issue_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn malformed_id_is_rejected() {
        assert_matches!(parse_issue_id("not-an-id"), Err(CoreError::InvalidId(raw)) if raw == "not-an-id");
        assert_matches!(parse_issue_id(""), Err(CoreError::InvalidId(_)));
    }
}
