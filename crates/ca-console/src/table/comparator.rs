//! Ascending/descending comparators over a named record field.

use super::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn flipped(self) -> Self {
        match self {
            Order::Asc => Order::Desc,
            Order::Desc => Order::Asc,
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Asc => write!(f, "asc"),
            Order::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Ordering function over records exposing `field`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    order: Order,
    field: String,
}

impl Comparator {
    pub fn new(order: Order, field: impl Into<String>) -> Self {
        Self {
            order,
            field: field.into(),
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Compare two records; equal field values yield `Ordering::Equal`
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        let descending = self.descending(a, b);
        match self.order {
            Order::Desc => descending,
            // Ascending is the exact inverse of descending
            Order::Asc => descending.reverse(),
        }
    }

    /// Larger natural-order value first; a missing value is smallest
    fn descending<R: Record>(&self, a: &R, b: &R) -> Ordering {
        match (a.field(&self.field), b.field(&self.field)) {
            (Some(a), Some(b)) => b.natural_cmp(&a),
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FieldValue;

    #[derive(Debug, Clone)]
    struct Row {
        id: String,
        name: Option<String>,
        score: f64,
        joined: &'static str,
    }

    impl Record for Row {
        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => self.name.clone().map(FieldValue::Text),
                "score" => Some(FieldValue::Number(self.score)),
                "joined" => Some(FieldValue::from(self.joined)),
                _ => None,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["name"]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: "1".into(), name: Some("bob".into()), score: 3.0, joined: "2024-02-01T10:00:00Z" },
            Row { id: "2".into(), name: Some("alice".into()), score: 7.5, joined: "2024-01-15T08:00:00Z" },
            Row { id: "3".into(), name: None, score: 7.5, joined: "2024-03-20T12:30:00Z" },
            Row { id: "4".into(), name: Some("carol".into()), score: -1.0, joined: "2023-12-31T23:59:59Z" },
        ]
    }

    #[test]
    fn test_asc_is_negation_of_desc() {
        let rows = rows();
        for field in ["name", "score", "joined", "unknown"] {
            let asc = Comparator::new(Order::Asc, field);
            let desc = Comparator::new(Order::Desc, field);
            for a in &rows {
                for b in &rows {
                    assert_eq!(asc.compare(a, b), desc.compare(a, b).reverse(), "field {field}");
                }
            }
        }
    }

    #[test]
    fn test_desc_puts_larger_first() {
        let mut rows = rows();
        rows.sort_by(|a, b| Comparator::new(Order::Desc, "score").compare(a, b));
        assert_eq!(rows[0].score, 7.5);
        assert_eq!(rows[3].score, -1.0);
    }

    #[test]
    fn test_dates_sort_newest_first_under_desc() {
        let mut rows = rows();
        rows.sort_by(|a, b| Comparator::new(Order::Desc, "joined").compare(a, b));
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2", "4"]);
    }

    #[test]
    fn test_equal_values_compare_equal() {
        let rows = rows();
        let cmp = Comparator::new(Order::Asc, "score");
        assert_eq!(cmp.compare(&rows[1], &rows[2]), Ordering::Equal);
    }

    #[test]
    fn test_missing_values_sort_first_ascending() {
        let mut rows = rows();
        rows.sort_by(|a, b| Comparator::new(Order::Asc, "name").compare(a, b));
        assert_eq!(rows[0].id, "3");
        assert_eq!(rows[1].name.as_deref(), Some("alice"));
    }

    #[test]
    fn test_order_parsing() {
        assert_eq!("DESC".parse::<Order>().unwrap(), Order::Desc);
        assert!("sideways".parse::<Order>().is_err());
        assert_eq!(Order::Asc.flipped(), Order::Desc);
    }
}
