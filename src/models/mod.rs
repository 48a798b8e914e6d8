//! Request and response shapes shared by every list view

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{SyncError, SyncResult};

/// A single query parameter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Flag(bool),
}

impl QueryValue {
    /// Empty strings and the `"none"` sentinel are never sent
    pub fn is_blank(&self) -> bool {
        match self {
            QueryValue::Text(text) => {
                let trimmed = text.trim();
                trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none")
            }
            QueryValue::Integer(_) | QueryValue::Flag(_) => false,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(text) => write!(f, "{}", text.trim()),
            QueryValue::Integer(n) => write!(f, "{}", n),
            QueryValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Flag(value)
    }
}

/// Canonical request sent to a list endpoint.
///
/// Blank values are dropped on insertion, so a `ListQuery` can never carry
/// an empty string or the `"none"` sentinel to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    params: BTreeMap<String, QueryValue>,
    page: u32,
}

impl ListQuery {
    pub fn new() -> Self {
        Self {
            params: BTreeMap::new(),
            page: 1,
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a parameter. Returns `false` when the value was blank and
    /// the key was removed instead.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> bool {
        let key = key.into();
        let value = value.into();
        if value.is_blank() {
            self.params.remove(&key);
            return false;
        }
        self.params.insert(key, value);
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.params.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Copy of this query pointing at another page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            params: self.params.clone(),
            page: page.max(1),
        }
    }

    pub fn params(&self) -> &BTreeMap<String, QueryValue> {
        &self.params
    }

    /// Ordered key/value pairs, `page` last. Used as the query string for GET
    /// endpoints and as the form body for POST endpoints.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .params
            .iter()
            .filter(|(key, _)| key.as_str() != "page")
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Pagination descriptor returned with every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: Option<u32>,
    pub next_page_url: Option<String>,
}

impl PageMeta {
    pub fn new(current_page: u32, last_page: u32) -> Self {
        Self {
            current_page,
            last_page: Some(last_page),
            next_page_url: None,
        }
    }

    /// A lone page with nothing after it
    pub fn single() -> Self {
        Self::new(1, 1)
    }

    pub fn has_more(&self) -> bool {
        self.has_more_after(self.current_page)
    }

    /// `has_more` evaluated for an explicit current page. `last_page` wins
    /// when present; otherwise the nullness of `next_page_url` decides.
    pub fn has_more_after(&self, current_page: u32) -> bool {
        match self.last_page {
            Some(last_page) => current_page < last_page,
            None => self.next_page_url.is_some(),
        }
    }

    /// Read a descriptor from a JSON object holding any of `current_page`,
    /// `last_page` and `next_page_url`. A missing `current_page` reads as 1;
    /// the controller raises it to the page it requested.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if !["current_page", "last_page", "next_page_url"]
            .iter()
            .any(|key| object.contains_key(*key))
        {
            return None;
        }

        let current_page = object
            .get("current_page")
            .and_then(as_page_number)
            .unwrap_or(1);
        let last_page = object.get("last_page").and_then(as_page_number);
        let next_page_url = object
            .get("next_page_url")
            .and_then(|v| v.as_str())
            .filter(|url| !url.is_empty())
            .map(|url| url.to_string());

        Some(Self {
            current_page: current_page.max(1),
            last_page,
            next_page_url,
        })
    }
}

fn as_page_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// One page of records plus its pagination descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self { items, meta }
    }

    /// Map the records while keeping the descriptor
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> ListPage<U> {
        ListPage {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

impl<T: DeserializeOwned> ListPage<T> {
    /// Decode a response envelope.
    ///
    /// `items_key` is a dotted path to the record array (`"data"`,
    /// `"data.events"`). The descriptor is looked up in a `meta` object next
    /// to the array, then as flat fields next to the array, then in a
    /// top-level `meta`. A response with no descriptor at all is treated as
    /// a single page.
    pub fn from_envelope(body: Value, items_key: &str) -> SyncResult<Self> {
        let mut parent = &body;
        let mut segments = items_key.split('.').peekable();
        let mut raw_items = None;

        while let Some(segment) = segments.next() {
            let child = parent.get(segment).ok_or_else(|| {
                SyncError::Decode(format!("Missing '{}' in response envelope", items_key))
            })?;
            if segments.peek().is_none() {
                raw_items = Some(child);
            } else {
                parent = child;
            }
        }

        let raw_items = raw_items
            .and_then(|v| v.as_array())
            .ok_or_else(|| SyncError::Decode(format!("'{}' is not an array", items_key)))?;

        let items = raw_items
            .iter()
            .cloned()
            .map(serde_json::from_value::<T>)
            .collect::<Result<Vec<T>, _>>()?;

        let meta = parent
            .get("meta")
            .and_then(PageMeta::from_value)
            .or_else(|| PageMeta::from_value(parent))
            .or_else(|| body.get("meta").and_then(PageMeta::from_value))
            .unwrap_or_else(PageMeta::single);

        Ok(Self { items, meta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[test]
    fn test_blank_values_are_stripped() {
        let mut query = ListQuery::new()
            .with("keyword", "arsenal")
            .with("status", "none")
            .with("venue", "   ");

        assert_eq!(query.params().len(), 1);
        assert!(!query.insert("keyword", ""));
        assert!(query.get("keyword").is_none());
        assert!(query.insert("limit", 20i64));
    }

    #[test]
    fn test_pairs_put_page_last() {
        let query = ListQuery::new()
            .with("sort", "date")
            .with("keyword", "arsenal")
            .with("only_active", true)
            .with_page(3);

        assert_eq!(
            query.to_pairs(),
            vec![
                ("keyword".to_string(), "arsenal".to_string()),
                ("only_active".to_string(), "true".to_string()),
                ("sort".to_string(), "date".to_string()),
                ("page".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(ListQuery::new().with_page(0).page(), 1);
    }

    #[test]
    fn test_meta_has_more() {
        assert!(PageMeta::new(1, 3).has_more());
        assert!(!PageMeta::new(3, 3).has_more());
        assert!(PageMeta::new(3, 3).has_more_after(2));

        let by_url = PageMeta {
            current_page: 2,
            last_page: None,
            next_page_url: Some("https://api/x?page=3".to_string()),
        };
        assert!(by_url.has_more());
    }

    #[test]
    fn test_envelope_with_nested_meta() {
        let body = json!({
            "data": [{"id": 1}, {"id": 2}],
            "meta": {"current_page": 1, "last_page": 4}
        });
        let page: ListPage<Row> = ListPage::from_envelope(body, "data").unwrap();
        assert_eq!(page.items, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(page.meta, PageMeta::new(1, 4));
    }

    #[test]
    fn test_envelope_with_flat_laravel_fields() {
        let body = json!({
            "status": true,
            "data": {
                "current_page": "2",
                "data": [{"id": 7}],
                "next_page_url": null,
                "last_page": 2
            }
        });
        let page: ListPage<Row> = ListPage::from_envelope(body, "data.data").unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.meta.current_page, 2);
        assert!(!page.meta.has_more());
    }

    #[test]
    fn test_envelope_with_only_next_page_url() {
        let body = json!({
            "data": [{"id": 1}],
            "next_page_url": "https://api/x?page=2"
        });
        let page: ListPage<Row> = ListPage::from_envelope(body, "data").unwrap();
        assert_eq!(page.meta.current_page, 1);
        assert_eq!(page.meta.last_page, None);
        assert!(page.meta.has_more());
        assert!(page.meta.has_more_after(5));

        let body = json!({"data": [{"id": 2}], "next_page_url": null});
        let page: ListPage<Row> = ListPage::from_envelope(body, "data").unwrap();
        assert!(!page.meta.has_more());
    }

    #[test]
    fn test_envelope_without_descriptor_is_single_page() {
        let body = json!({"events": []});
        let page: ListPage<Row> = ListPage::from_envelope(body, "events").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.meta, PageMeta::single());
    }

    #[test]
    fn test_envelope_errors() {
        let missing = ListPage::<Row>::from_envelope(json!({"meta": {}}), "data");
        assert!(matches!(missing, Err(SyncError::Decode(_))));

        let bad_item = ListPage::<Row>::from_envelope(json!({"data": [{"id": "x"}]}), "data");
        assert!(matches!(bad_item, Err(SyncError::Decode(_))));
    }
}
