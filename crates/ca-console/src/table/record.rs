//! Generic view-model records and their field values.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// A scalar (or list) field of a record as seen by the table pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    List(Vec<String>),
}

impl FieldValue {
    /// String form used for text search and exact-match filters
    pub fn as_filter_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Timestamp(ts) => ts.to_rfc3339(),
            FieldValue::List(items) => items.join(", "),
        }
    }

    /// Epoch milliseconds when the value is a timestamp or an RFC 3339 string
    pub fn as_timestamp_ms(&self) -> Option<i64> {
        match self {
            FieldValue::Timestamp(ts) => Some(ts.timestamp_millis()),
            FieldValue::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| ts.timestamp_millis()),
            _ => None,
        }
    }

    /// Natural (ascending) order between two values
    ///
    /// Date-like values compare by instant, everything else by kind; values
    /// of different kinds fall back to their string forms.
    pub fn natural_cmp(&self, other: &FieldValue) -> Ordering {
        if let (Some(a), Some(b)) = (self.as_timestamp_ms(), other.as_timestamp_ms()) {
            return a.cmp(&b);
        }

        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::List(a), FieldValue::List(b)) => a.cmp(b),
            (a, b) => a.as_filter_string().cmp(&b.as_filter_string()),
        }
    }

    /// Whether a list value contains `needle`; scalars compare by equality
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            FieldValue::List(items) => items.iter().any(|item| item == needle),
            other => other.as_filter_string() == needle,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// A flat record rendered as one table row
pub trait Record: Clone {
    /// Identifier used for row selection and optimistic updates
    fn id(&self) -> &str;

    /// Value of the named field; `None` for unknown or empty fields
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Fields the free-text query searches
    fn search_fields() -> &'static [&'static str];
}
