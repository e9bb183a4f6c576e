//! Stable sort followed by criteria narrowing.

use super::comparator::Comparator;
use super::record::Record;
use std::collections::BTreeMap;

/// Filter selections of one listing screen
///
/// `""` and `"all"` are no-op values for every filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against the record's searchable fields
    pub query: String,
    /// Field name -> value that must match the field exactly
    pub exact: BTreeMap<String, String>,
    /// List field name -> value the list must contain
    pub membership: BTreeMap<String, String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_exact(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.exact.insert(field.into(), value.into());
        self
    }

    pub fn with_membership(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.membership.insert(field.into(), value.into());
        self
    }

    /// Whether `value` leaves the sequence untouched
    pub fn is_noop_value(value: &str) -> bool {
        let value = value.trim();
        value.is_empty() || value.eq_ignore_ascii_case("all")
    }

    /// True when no filter would narrow anything
    pub fn is_noop(&self) -> bool {
        Self::is_noop_value(&self.query)
            && self.exact.values().all(|v| Self::is_noop_value(v))
            && self.membership.values().all(|v| Self::is_noop_value(v))
    }

    /// True when the criteria leave a record in the result
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.matches_query(record)
            && Self::active(&self.exact).all(|(field, value)| {
                record
                    .field(field)
                    .map(|v| v.as_filter_string() == value)
                    .unwrap_or(false)
            })
            && Self::active(&self.membership).all(|(field, value)| {
                record.field(field).map(|v| v.contains(value)).unwrap_or(false)
            })
    }

    fn matches_query<R: Record>(&self, record: &R) -> bool {
        if Self::is_noop_value(&self.query) {
            return true;
        }
        let needle = self.query.trim().to_lowercase();
        R::search_fields().iter().any(|field| {
            record
                .field(field)
                .map(|v| v.as_filter_string().to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    }

    fn active(filters: &BTreeMap<String, String>) -> impl Iterator<Item = (&str, &str)> {
        filters
            .iter()
            .filter(|(_, value)| !Self::is_noop_value(value))
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

/// Sort `records` stably with `comparator`, then narrow them by `criteria`
///
/// The input is left untouched. Ties keep input order regardless of the
/// underlying sort algorithm.
pub fn apply_filter<R: Record>(
    records: &[R],
    comparator: &Comparator,
    criteria: &FilterCriteria,
) -> Vec<R> {
    let mut indexed: Vec<(usize, &R)> = records.iter().enumerate().collect();
    indexed.sort_unstable_by(|(ia, a), (ib, b)| comparator.compare(*a, *b).then(ia.cmp(ib)));

    indexed
        .into_iter()
        .map(|(_, record)| record)
        .filter(|record| criteria.matches(*record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{FieldValue, Order};

    #[derive(Debug, Clone, PartialEq)]
    struct Member {
        id: String,
        username: String,
        full_name: String,
        email: String,
        status: &'static str,
        currency: &'static str,
        methods: Vec<String>,
        balance: f64,
    }

    impl Record for Member {
        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "username" => Some(self.username.as_str().into()),
                "full_name" => Some(self.full_name.as_str().into()),
                "email" => Some(self.email.as_str().into()),
                "status" => Some(self.status.into()),
                "currency" => Some(self.currency.into()),
                "methods" => Some(self.methods.clone().into()),
                "balance" => Some(self.balance.into()),
                _ => None,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["username", "full_name", "email"]
        }
    }

    fn member(id: usize, username: &str, full_name: &str, email: &str, status: &'static str) -> Member {
        Member {
            id: id.to_string(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            status,
            currency: if id % 2 == 0 { "INR" } else { "USD" },
            methods: if id % 3 == 0 {
                vec!["social".into(), "email".into()]
            } else {
                vec!["seo".into()]
            },
            balance: (id % 4) as f64,
        }
    }

    fn ten_members() -> Vec<Member> {
        vec![
            member(0, "jdoe", "John Doe", "john@example.com", "active"),
            member(1, "JaneR", "Jane Roe", "jr@example.com", "active"),
            member(2, "mike", "Mike Hill", "mike@example.com", "inactive"),
            member(3, "sara", "Sara Lin", "sara@example.com", "active"),
            member(4, "tom", "Tom Cole", "tom@example.com", "blocked"),
            member(5, "anna", "Anna Bell", "JANE.alt@example.com", "active"),
            member(6, "li", "Li Wei", "li@example.com", "inactive"),
            member(7, "omar", "Omar Said", "omar@example.com", "active"),
            member(8, "eve", "Eve Park", "eve@example.com", "active"),
            member(9, "zoe", "Zoe King", "zoe@example.com", "inactive"),
        ]
    }

    fn by_username() -> Comparator {
        Comparator::new(Order::Asc, "username")
    }

    #[test]
    fn test_name_query_matches_case_insensitively_across_fields() {
        let records = ten_members();
        let criteria = FilterCriteria::new().with_query("jane");

        let result = apply_filter(&records, &by_username(), &criteria);

        let ids: Vec<&str> = result.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"1"));
        assert!(ids.contains(&"5"));
    }

    #[test]
    fn test_noop_criteria_only_resort() {
        let records = ten_members();
        let criteria = FilterCriteria::new()
            .with_query("")
            .with_exact("status", "all")
            .with_exact("currency", "")
            .with_membership("methods", "All");
        assert!(criteria.is_noop());

        let result = apply_filter(&records, &by_username(), &criteria);

        assert_eq!(result.len(), records.len());
        assert_eq!(result[0].username, "JaneR");
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = ten_members();
        let criteria = FilterCriteria::new()
            .with_exact("status", "active")
            .with_membership("methods", "seo");
        let cmp = Comparator::new(Order::Desc, "balance");

        let once = apply_filter(&records, &cmp, &criteria);
        let twice = apply_filter(&once, &cmp, &criteria);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let records = ten_members();
        let result = apply_filter(&records, &Comparator::new(Order::Desc, "balance"), &FilterCriteria::new());

        for pair in result.windows(2) {
            if pair[0].balance == pair[1].balance {
                let a: usize = pair[0].id.parse().unwrap();
                let b: usize = pair[1].id.parse().unwrap();
                assert!(a < b, "ties must keep input order");
            }
        }
        assert_eq!(result[0].balance, 3.0);
        assert_eq!(result[0].id, "3");
    }

    #[test]
    fn test_categorical_and_membership_filters_combine() {
        let records = ten_members();
        let criteria = FilterCriteria::new()
            .with_exact("currency", "INR")
            .with_membership("methods", "social");

        let result = apply_filter(&records, &by_username(), &criteria);

        let ids: Vec<&str> = result.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "6"]);
    }

    #[test]
    fn test_unknown_field_filters_everything_out() {
        let records = ten_members();
        let criteria = FilterCriteria::new().with_exact("nonexistent", "x");
        assert!(apply_filter(&records, &by_username(), &criteria).is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = ten_members();
        let before = records.clone();
        let _ = apply_filter(&records, &Comparator::new(Order::Desc, "username"), &FilterCriteria::new());
        assert_eq!(records, before);
    }
}
