use chrono::NaiveDate;

use crate::models::ListQuery;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw value of one filter input
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Free-text search or a select dropdown
    Text(String),
    Number(i64),
    /// Checkbox; an unchecked box is an inactive filter
    Flag(bool),
    /// Expanded into `start_date` / `end_date` parameters
    DateRange {
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
    Cleared,
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn date_range(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        FilterValue::DateRange {
            start_date,
            end_date,
        }
    }

    /// Whether this value contributes nothing to a query
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(text) => {
                let trimmed = text.trim();
                trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none")
            }
            FilterValue::Number(_) => false,
            FilterValue::Flag(checked) => !checked,
            FilterValue::DateRange {
                start_date,
                end_date,
            } => start_date.is_none() && end_date.is_none(),
            FilterValue::Cleared => true,
        }
    }

    /// Write this filter into a query under `key`
    pub fn apply_to(&self, query: &mut ListQuery, key: &str) {
        if self.is_empty() {
            return;
        }
        match self {
            FilterValue::Text(text) => {
                query.insert(key, text.trim());
            }
            FilterValue::Number(n) => {
                query.insert(key, *n);
            }
            FilterValue::Flag(checked) => {
                query.insert(key, *checked);
            }
            FilterValue::DateRange {
                start_date,
                end_date,
            } => {
                if let Some(start) = start_date {
                    query.insert("start_date", start.format(DATE_FORMAT).to_string());
                }
                if let Some(end) = end_date {
                    query.insert("end_date", end.format(DATE_FORMAT).to_string());
                }
            }
            FilterValue::Cleared => {}
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Flag(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryValue;

    #[test]
    fn test_date_range_expands_to_two_params() {
        let mut query = ListQuery::new();
        FilterValue::date_range(
            NaiveDate::from_ymd_opt(2024, 3, 1),
            NaiveDate::from_ymd_opt(2024, 3, 31),
        )
        .apply_to(&mut query, "event_date");

        assert!(query.get("event_date").is_none());
        assert_eq!(
            query.get("start_date"),
            Some(&QueryValue::Text("2024-03-01".to_string()))
        );
        assert_eq!(
            query.get("end_date"),
            Some(&QueryValue::Text("2024-03-31".to_string()))
        );
    }

    #[test]
    fn test_empty_values() {
        assert!(FilterValue::text("  ").is_empty());
        assert!(FilterValue::text("None").is_empty());
        assert!(FilterValue::Flag(false).is_empty());
        assert!(FilterValue::date_range(None, None).is_empty());
        assert!(FilterValue::Cleared.is_empty());
        assert!(!FilterValue::Number(0).is_empty());
        assert!(!FilterValue::text("arsenal").is_empty());
    }
}
