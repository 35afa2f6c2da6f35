//! Issue field semantics.
//!
//! Request bodies arrive as loose key/value maps (JSON or form encoded), and
//! the rules for them are not uniform:
//!
//! - Create checks that the required keys are *present*; the values may be
//!   empty and are stored as empty strings.
//! - Update keeps a text field only when its value is *truthy*, so an empty
//!   string cannot clear a field.
//! - `open` is special in both list filters and updates: key presence is what
//!   matters, and the value is compared case-insensitively to `"true"`.
//!
//! The builders in this module turn those maps into typed filters, inserts
//! and change sets for the store layer.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::{parse_issue_id, IssueId};

/// A decoded request body.
pub type FieldMap = Map<String, Value>;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

pub const FIELD_ID: &str = "_id";
pub const FIELD_ISSUE_TITLE: &str = "issue_title";
pub const FIELD_ISSUE_TEXT: &str = "issue_text";
pub const FIELD_CREATED_BY: &str = "created_by";
pub const FIELD_ASSIGNED_TO: &str = "assigned_to";
pub const FIELD_STATUS_TEXT: &str = "status_text";
pub const FIELD_OPEN: &str = "open";

/// Keys that must be present in a create request.
pub const REQUIRED_FIELDS: &[&str] = &[FIELD_ISSUE_TITLE, FIELD_ISSUE_TEXT, FIELD_CREATED_BY];

// ---------------------------------------------------------------------------
// Response messages
// ---------------------------------------------------------------------------

pub const MSG_REQUIRED_FIELDS_MISSING: &str = "required field(s) missing";
pub const MSG_MISSING_ID: &str = "missing _id";
pub const MSG_NO_UPDATE_FIELDS: &str = "no update field(s) sent";
pub const MSG_UPDATED: &str = "successfully updated";
pub const MSG_COULD_NOT_UPDATE: &str = "could not update";
pub const MSG_DELETED: &str = "successfully deleted";
pub const MSG_COULD_NOT_DELETE: &str = "could not delete";

// ---------------------------------------------------------------------------
// Value coercion
// ---------------------------------------------------------------------------

/// Whether a body value counts as "set". `null`, `false`, `0` and the empty
/// string do not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a body value as text, without quoting plain strings.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The text of a field if it is present and truthy.
pub fn truthy_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(value_text)
}

/// Compare a raw flag to `"true"`, ignoring case. Anything else is `false`.
pub fn parse_open_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

/// Coerce a body value for `open` the same way a query string value is.
pub fn open_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => parse_open_flag(&flag_text(other)),
    }
}

/// Flatten a flag value to text. Arrays join their elements with `,` (so
/// `["true"]` reads as `true`), and `null` elements render as nothing.
fn flag_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => flag_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => value_text(other),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Fail with `message` if any of `fields` is absent from `body`.
///
/// Only key presence is checked. A single message is produced no matter how
/// many keys are missing.
pub fn require_fields(body: &FieldMap, fields: &[&str], message: &str) -> Result<(), CoreError> {
    if fields.iter().all(|f| body.contains_key(*f)) {
        Ok(())
    } else {
        Err(CoreError::Validation(message.to_string()))
    }
}

/// Validate that a create request carries every required key.
pub fn validate_create(body: &FieldMap) -> Result<(), CoreError> {
    require_fields(body, REQUIRED_FIELDS, MSG_REQUIRED_FIELDS_MISSING)
}

/// Validate that an update or delete request names the issue, returning the
/// submitted `_id` value as sent.
pub fn require_id(body: &FieldMap) -> Result<&Value, CoreError> {
    body.get(FIELD_ID)
        .ok_or_else(|| CoreError::Validation(MSG_MISSING_ID.to_string()))
}

/// Parse a submitted `_id` body value into an identifier.
pub fn parse_body_id(value: &Value) -> Result<IssueId, CoreError> {
    parse_issue_id(&value_text(value))
}

// ---------------------------------------------------------------------------
// List filter
// ---------------------------------------------------------------------------

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IssueListParams {
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub open: Option<String>,
}

impl IssueListParams {
    /// Collect raw query pairs.
    ///
    /// A repeated key keeps every value, joined with `,` in order. `id` is
    /// accepted as an alias and only used when no `_id` was sent. Unknown
    /// keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        fn push(slot: &mut Option<String>, value: String) {
            match slot {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => *slot = Some(value),
            }
        }

        let mut params = Self::default();
        let mut id_alias = None;
        for (key, value) in pairs {
            let slot = match key.as_str() {
                FIELD_ID => &mut params.id,
                "id" => &mut id_alias,
                FIELD_ISSUE_TITLE => &mut params.issue_title,
                FIELD_ISSUE_TEXT => &mut params.issue_text,
                FIELD_CREATED_BY => &mut params.created_by,
                FIELD_ASSIGNED_TO => &mut params.assigned_to,
                FIELD_OPEN => &mut params.open,
                _ => continue,
            };
            push(slot, value);
        }
        if params.id.is_none() {
            params.id = id_alias;
        }
        params
    }
}

/// A conjunction of exact-match constraints. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub project: String,
    pub id: Option<IssueId>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub open: Option<bool>,
}

impl IssueFilter {
    /// A filter matching every issue in `project`.
    pub fn for_project(project: &str) -> Self {
        Self {
            project: project.to_string(),
            ..Self::default()
        }
    }

    /// Build a filter from list query parameters.
    ///
    /// Empty text parameters are ignored. `open` constrains the result as
    /// soon as the key is present, even with an empty value.
    pub fn from_params(project: &str, params: &IssueListParams) -> Result<Self, CoreError> {
        let non_empty = |v: &Option<String>| v.as_ref().filter(|s| !s.is_empty()).cloned();

        let id = match non_empty(&params.id) {
            Some(raw) => Some(parse_issue_id(&raw)?),
            None => None,
        };

        Ok(Self {
            project: project.to_string(),
            id,
            issue_title: non_empty(&params.issue_title),
            issue_text: non_empty(&params.issue_text),
            created_by: non_empty(&params.created_by),
            assigned_to: non_empty(&params.assigned_to),
            open: params.open.as_deref().map(parse_open_flag),
        })
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Field values for a new issue. The store assigns the id, sets `open` and
/// stamps both timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
}

impl NewIssue {
    /// Validate a create body and collect its fields. Falsy values become
    /// empty strings.
    pub fn from_body(project: &str, body: &FieldMap) -> Result<Self, CoreError> {
        validate_create(body)?;

        let text = |key: &str| truthy_text(body.get(key)).unwrap_or_default();

        Ok(Self {
            project: project.to_string(),
            issue_title: text(FIELD_ISSUE_TITLE),
            issue_text: text(FIELD_ISSUE_TEXT),
            created_by: text(FIELD_CREATED_BY),
            assigned_to: text(FIELD_ASSIGNED_TO),
            status_text: text(FIELD_STATUS_TEXT),
        })
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// A sparse set of changes. Only `Some` fields are written; `updated_on` is
/// always refreshed by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueChanges {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssueChanges {
    /// Collect the changes carried by an update body.
    pub fn from_body(body: &FieldMap) -> Self {
        let text = |key: &str| truthy_text(body.get(key));

        Self {
            issue_title: text(FIELD_ISSUE_TITLE),
            issue_text: text(FIELD_ISSUE_TEXT),
            created_by: text(FIELD_CREATED_BY),
            assigned_to: text(FIELD_ASSIGNED_TO),
            status_text: text(FIELD_STATUS_TEXT),
            open: body.get(FIELD_OPEN).map(open_flag),
        }
    }

    /// True when the body carried nothing to write.
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn truthiness_follows_loose_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(7)));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn open_flag_compares_to_true_ignoring_case() {
        assert!(open_flag(&json!(true)));
        assert!(open_flag(&json!("TRUE")));
        assert!(open_flag(&json!("True")));
        assert!(!open_flag(&json!(false)));
        assert!(!open_flag(&json!("")));
        assert!(!open_flag(&json!("yes")));
        assert!(!open_flag(&json!(1)));
        assert!(!open_flag(&json!(null)));
    }

    #[test]
    fn open_flag_flattens_arrays() {
        assert!(open_flag(&json!(["true"])));
        assert!(open_flag(&json!(["TRUE"])));
        assert!(!open_flag(&json!(["true", "false"])));
        assert!(!open_flag(&json!([null])));
        assert!(!open_flag(&json!({ "open": "true" })));
    }

    #[test]
    fn create_requires_all_three_keys() {
        let missing_text = body(json!({ "issue_title": "t", "created_by": "me" }));
        assert_matches!(
            NewIssue::from_body("p", &missing_text),
            Err(CoreError::Validation(msg)) if msg == MSG_REQUIRED_FIELDS_MISSING
        );

        let nothing = FieldMap::new();
        assert_matches!(
            NewIssue::from_body("p", &nothing),
            Err(CoreError::Validation(msg)) if msg == MSG_REQUIRED_FIELDS_MISSING
        );
    }

    #[test]
    fn create_accepts_present_but_empty_required_keys() {
        let b = body(json!({ "issue_title": "", "issue_text": null, "created_by": "me" }));
        let issue = NewIssue::from_body("p", &b).unwrap();
        assert_eq!(issue.issue_title, "");
        assert_eq!(issue.issue_text, "");
        assert_eq!(issue.created_by, "me");
    }

    #[test]
    fn create_defaults_optional_fields_to_empty() {
        let b = body(json!({ "issue_title": "t", "issue_text": "x", "created_by": "me" }));
        let issue = NewIssue::from_body("apitest", &b).unwrap();
        assert_eq!(issue.project, "apitest");
        assert_eq!(issue.assigned_to, "");
        assert_eq!(issue.status_text, "");
    }

    #[test]
    fn create_renders_non_string_scalars() {
        let b = body(json!({ "issue_title": 42, "issue_text": "x", "created_by": "me" }));
        let issue = NewIssue::from_body("p", &b).unwrap();
        assert_eq!(issue.issue_title, "42");
    }

    #[test]
    fn missing_id_is_reported() {
        let b = body(json!({ "issue_title": "t" }));
        assert_matches!(require_id(&b), Err(CoreError::Validation(msg)) if msg == MSG_MISSING_ID);

        let with_id = body(json!({ "_id": "" }));
        assert_eq!(require_id(&with_id).unwrap(), &json!(""));
    }

    #[test]
    fn changes_drop_falsy_text_fields() {
        let b = body(json!({ "_id": "x", "issue_title": "new", "issue_text": "", "created_by": null }));
        let changes = IssueChanges::from_body(&b);
        assert_eq!(changes.issue_title.as_deref(), Some("new"));
        assert_eq!(changes.issue_text, None);
        assert_eq!(changes.created_by, None);
        assert_eq!(changes.open, None);
        assert!(!changes.is_empty());
    }

    #[test]
    fn changes_with_only_id_are_empty() {
        let b = body(json!({ "_id": "x", "issue_text": "", "assigned_to": "" }));
        assert!(IssueChanges::from_body(&b).is_empty());
    }

    #[test]
    fn open_key_alone_is_a_change() {
        let b = body(json!({ "_id": "x", "open": "" }));
        let changes = IssueChanges::from_body(&b);
        assert_eq!(changes.open, Some(false));
        assert!(!changes.is_empty());

        let b = body(json!({ "_id": "x", "open": "true" }));
        assert_eq!(IssueChanges::from_body(&b).open, Some(true));
    }

    #[test]
    fn filter_ignores_empty_text_params() {
        let params = IssueListParams {
            issue_title: Some(String::new()),
            assigned_to: Some("Chai and Mocha".into()),
            ..IssueListParams::default()
        };
        let filter = IssueFilter::from_params("p", &params).unwrap();
        assert_eq!(filter.issue_title, None);
        assert_eq!(filter.assigned_to.as_deref(), Some("Chai and Mocha"));
        assert_eq!(filter.open, None);
        assert_eq!(filter.project, "p");
    }

    #[test]
    fn filter_open_is_presence_tested() {
        let with = |open: &str| IssueListParams {
            open: Some(open.into()),
            ..IssueListParams::default()
        };
        assert_eq!(IssueFilter::from_params("p", &with("true")).unwrap().open, Some(true));
        assert_eq!(IssueFilter::from_params("p", &with("TRUE")).unwrap().open, Some(true));
        assert_eq!(IssueFilter::from_params("p", &with("false")).unwrap().open, Some(false));
        assert_eq!(IssueFilter::from_params("p", &with("")).unwrap().open, Some(false));
        assert_eq!(IssueFilter::from_params("p", &with("banana")).unwrap().open, Some(false));
    }

    #[test]
    fn filter_rejects_malformed_id() {
        let params = IssueListParams {
            id: Some("zzz".into()),
            ..IssueListParams::default()
        };
        assert_matches!(IssueFilter::from_params("p", &params), Err(CoreError::InvalidId(_)));
    }

    #[test]
    fn filter_parses_valid_id() {
        let id = crate::types::new_issue_id();
        let params = IssueListParams {
            id: Some(id.to_string()),
            ..IssueListParams::default()
        };
        assert_eq!(IssueFilter::from_params("p", &params).unwrap().id, Some(id));
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn list_params_accept_underscore_id() {
        let params = IssueListParams::from_pairs(pairs(&[("_id", "abc"), ("open", "")]));
        assert_eq!(params.id.as_deref(), Some("abc"));
        assert_eq!(params.open.as_deref(), Some(""));
    }

    #[test]
    fn list_params_join_repeated_keys() {
        let params = IssueListParams::from_pairs(pairs(&[
            ("open", "true"),
            ("open", "false"),
            ("issue_title", "a"),
            ("issue_title", "b"),
        ]));
        assert_eq!(params.open.as_deref(), Some("true,false"));
        assert_eq!(params.issue_title.as_deref(), Some("a,b"));
        assert_eq!(IssueFilter::from_params("p", &params).unwrap().open, Some(false));
    }

    #[test]
    fn list_params_prefer_underscore_id_over_alias() {
        let params = IssueListParams::from_pairs(pairs(&[("id", "a"), ("_id", "b")]));
        assert_eq!(params.id.as_deref(), Some("b"));

        let params = IssueListParams::from_pairs(pairs(&[("id", "a"), ("unknown", "x")]));
        assert_eq!(params.id.as_deref(), Some("a"));
        assert_eq!(params, IssueListParams { id: Some("a".into()), ..IssueListParams::default() });
    }
}
