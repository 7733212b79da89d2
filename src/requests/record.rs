//! Canonical request record and the fail-soft normalizer.
//!
//! The normalizer is the boundary between the remote API and the rest of the
//! client: whatever shape the server sends, the collection store only ever
//! holds well-formed [`RequestRecord`]s. A raw record that cannot be
//! normalized is replaced by a sentinel record rather than an error — the
//! list keeps rendering, one row reads "Error loading request".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Untitled Request";
pub const DEFAULT_DESCRIPTION: &str = "No description";
pub const DEFAULT_CUSTOMER_NAME: &str = "Multiple Customers";
pub const SENTINEL_TITLE: &str = "Error loading request";
pub const UNKNOWN_ID: &str = "unknown";

// ─── Vocabulary enums ────────────────────────────────────────────────────────
//
// All three preserve unrecognized raw values in an `Other` arm instead of
// collapsing them: filtering compares the stored value exactly, and the
// per-kind counts must not count a record whose kind is neither feature nor
// issue.

/// Top-level partition of records: feature request vs. reported issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestKind {
    Feature,
    #[default]
    Issue,
    Other(String),
}

impl RequestKind {
    pub fn as_str(&self) -> &str {
        match self {
            RequestKind::Feature => "feature",
            RequestKind::Issue => "issue",
            RequestKind::Other(raw) => raw,
        }
    }
}

impl From<String> for RequestKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "feature" => RequestKind::Feature,
            "issue" => RequestKind::Issue,
            _ => RequestKind::Other(raw),
        }
    }
}

impl From<&str> for RequestKind {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<RequestKind> for String {
    fn from(kind: RequestKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request lifecycle status.
///
/// Storage keeps the raw server value: a record the server reports as
/// `pending` stays `pending` here, and status filtering compares that stored
/// value exactly. Only the UI label folds `pending` into "open" — see
/// [`RequestStatus::label`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    #[default]
    Pending,
    Open,
    InProgress,
    Resolved,
    Closed,
    Review,
    Other(String),
}

impl RequestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Open => "open",
            RequestStatus::InProgress => "in-progress",
            RequestStatus::Resolved => "resolved",
            RequestStatus::Closed => "closed",
            RequestStatus::Review => "review",
            RequestStatus::Other(raw) => raw,
        }
    }

    /// Display label: `pending` renders as "open", everything else as stored.
    pub fn label(&self) -> &str {
        match self {
            RequestStatus::Pending => "open",
            other => other.as_str(),
        }
    }
}

impl From<String> for RequestStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => RequestStatus::Pending,
            "open" => RequestStatus::Open,
            "in-progress" => RequestStatus::InProgress,
            "resolved" => RequestStatus::Resolved,
            "closed" => RequestStatus::Closed,
            "review" => RequestStatus::Review,
            _ => RequestStatus::Other(raw),
        }
    }
}

impl From<&str> for RequestStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Other(raw) => raw,
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other(raw),
        }
    }
}

impl From<&str> for Priority {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── RequestRecord ───────────────────────────────────────────────────────────

/// One customer request, in the canonical shape the collection store holds.
///
/// `id` uniqueness is assumed, never enforced — a duplicate id resolves to
/// "first match wins" in [`update_by_id`](super::store::RequestCollectionState::update_by_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: RequestKind,
    pub status: RequestStatus,
    pub priority: Priority,
    /// Opaque customer references. `None` means the source carried no
    /// customer data (absent or not a sequence) — distinct from an empty
    /// list only for count-range filters that exclude zero.
    #[serde(default)]
    pub customer_list: Option<Vec<Value>>,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─── Normalizer ──────────────────────────────────────────────────────────────

/// Map a raw remote record into the canonical shape. Total: never panics,
/// never errors.
///
/// A raw value that is not an object, or an object with no extractable id,
/// yields the sentinel record (`title = "Error loading request"`, id
/// `"unknown"` unless one could be read). Every optional field falls back to
/// its documented default; timestamps default to normalization time.
pub fn normalize(raw: &Value) -> RequestRecord {
    let now = Utc::now();
    match try_normalize(raw, now) {
        Some(record) => record,
        None => sentinel(extract_id(raw), now),
    }
}

fn try_normalize(raw: &Value, now: DateTime<Utc>) -> Option<RequestRecord> {
    let obj = raw.as_object()?;
    let id = extract_id(raw)?;

    Some(RequestRecord {
        id,
        title: str_field(obj, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: str_field(obj, "description")
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        kind: str_field(obj, "type")
            .map(RequestKind::from)
            .unwrap_or_default(),
        status: str_field(obj, "status")
            .map(RequestStatus::from)
            .unwrap_or_default(),
        priority: str_field(obj, "priority")
            .map(Priority::from)
            .unwrap_or_default(),
        customer_list: obj.get("customerList").and_then(Value::as_array).cloned(),
        customer_name: str_field(obj, "customerName")
            .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
        created_at: time_field(obj, "createdAt").unwrap_or(now),
        updated_at: time_field(obj, "updatedAt").unwrap_or(now),
    })
}

fn sentinel(id: Option<String>, now: DateTime<Utc>) -> RequestRecord {
    RequestRecord {
        id: id.unwrap_or_else(|| UNKNOWN_ID.to_string()),
        title: SENTINEL_TITLE.to_string(),
        description: DEFAULT_DESCRIPTION.to_string(),
        kind: RequestKind::Issue,
        status: RequestStatus::Pending,
        priority: Priority::Medium,
        customer_list: None,
        customer_name: DEFAULT_CUSTOMER_NAME.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Read the record id from `_id` or `id`, accepting string and integer forms.
fn extract_id(raw: &Value) -> Option<String> {
    let candidate = raw.get("_id").or_else(|| raw.get("id"))?;
    if let Some(s) = candidate.as_str() {
        if s.is_empty() {
            return None;
        }
        return Some(s.to_string());
    }
    if let Some(n) = candidate.as_i64() {
        return Some(n.to_string());
    }
    None
}

fn str_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn time_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let raw = obj.get(key)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
