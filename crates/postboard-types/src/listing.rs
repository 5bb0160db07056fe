//! Listing request and page result types for post feeds.
//!
//! `ListingRequest` is deliberately loose: every field, nested ones included,
//! is kept as a raw JSON value so that a malformed optional field
//! (`"take": "ten"`, `"cursor": "abc"`, `"orderBy": ["score", "asc"]`) never
//! fails deserialization. Interpretation happens in `postboard_core::listing`,
//! which falls back to "no pagination" and "newest first" for anything it
//! cannot read.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use std::fmt;
use std::str::FromStr;

use crate::post::PostId;

/// A client-supplied listing request. All fields are optional and independent.
///
/// `cursor` is expected to look like `{ "id": 12 }` and `orderBy` like
/// `{ "key": "score", "order": "desc" }`; any other shape reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    #[serde(default)]
    pub skip: Option<Value>,
    #[serde(default)]
    pub take: Option<Value>,
    #[serde(default)]
    pub cursor: Option<Value>,
    #[serde(default)]
    pub filter: Option<Value>,
    #[serde(default)]
    pub order_by: Option<Value>,
}

/// `value[field]` when `value` is an object holding a non-null `field`.
fn object_field<'a>(value: Option<&'a Value>, field: &str) -> Option<&'a Value> {
    value
        .and_then(Value::as_object)
        .and_then(|object| object.get(field))
        .filter(|v| !v.is_null())
}

impl ListingRequest {
    /// Request page `take` starting `skip` rows in.
    pub fn page(skip: i64, take: i64) -> Self {
        Self {
            skip: Some(Value::from(skip)),
            take: Some(Value::from(take)),
            ..Default::default()
        }
    }

    pub fn with_cursor(mut self, id: impl Into<Value>) -> Self {
        self.cursor = Some(json!({ "id": id.into() }));
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(Value::String(filter.into()));
        self
    }

    pub fn with_order(mut self, key: impl Into<String>, order: impl Into<String>) -> Self {
        self.order_by = Some(json!({ "key": key.into(), "order": order.into() }));
        self
    }

    pub fn cursor_id(&self) -> Option<&Value> {
        object_field(self.cursor.as_ref(), "id")
    }

    pub fn order_key(&self) -> Option<&Value> {
        object_field(self.order_by.as_ref(), "key")
    }

    pub fn order_direction(&self) -> Option<&Value> {
        object_field(self.order_by.as_ref(), "order")
    }
}

/// Recognized sort keys for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Creation timestamp.
    CreatedAt,
    /// Number of comments on the post (derived, not a stored column).
    Activity,
    /// Stored vote score.
    Score,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::CreatedAt => write!(f, "createdAt"),
            SortKey::Activity => write!(f, "activity"),
            SortKey::Score => write!(f, "score"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "createdat" | "created_at" => Ok(SortKey::CreatedAt),
            "activity" => Ok(SortKey::Activity),
            "score" => Ok(SortKey::Score),
            other => Err(format!("invalid sort key: '{other}'")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("invalid sort direction: '{other}'")),
        }
    }
}

/// Where the next page should start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Id of the last item on this page; absent when the page is empty.
    pub id: Option<PostId>,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Number of items the page reports (never negative).
    pub count: u64,
    /// True when no further records exist past this page.
    pub end: bool,
    pub cursor: PageCursor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_request_tolerates_malformed_fields() {
        let raw = json!({
            "skip": "zero",
            "take": null,
            "cursor": { "id": "abc" },
            "filter": 12,
            "orderBy": { "key": "popularity", "order": "sideways" }
        });
        let req: ListingRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(req.skip, Some(json!("zero")));
        assert_eq!(req.take, None);
        assert_eq!(req.cursor_id(), Some(&json!("abc")));
        assert_eq!(req.order_key(), Some(&json!("popularity")));
    }

    #[test]
    fn test_listing_request_tolerates_wrong_shapes() {
        let raw = json!({
            "skip": 0,
            "take": 2,
            "cursor": "abc",
            "orderBy": ["score", "asc"]
        });
        let req: ListingRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(req.cursor_id(), None);
        assert_eq!(req.order_key(), None);
        assert_eq!(req.order_direction(), None);

        let req: ListingRequest = serde_json::from_value(json!({ "orderBy": "score" })).unwrap();
        assert_eq!(req.order_key(), None);

        let req: ListingRequest = serde_json::from_value(json!({ "cursor": { "id": null } })).unwrap();
        assert_eq!(req.cursor_id(), None);
    }

    #[test]
    fn test_listing_request_empty_object() {
        let req: ListingRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, ListingRequest::default());
    }

    #[test]
    fn test_listing_request_builders() {
        let req = ListingRequest::page(0, 10)
            .with_cursor(5)
            .with_filter("cat")
            .with_order("score", "asc");
        assert_eq!(req.skip, Some(json!(0)));
        assert_eq!(req.take, Some(json!(10)));
        assert_eq!(req.cursor_id(), Some(&json!(5)));
        assert_eq!(req.filter, Some(json!("cat")));
        assert_eq!(req.order_key(), Some(&json!("score")));
        assert_eq!(req.order_direction(), Some(&json!("asc")));
    }

    #[test]
    fn test_sort_key_parse_is_case_insensitive() {
        assert_eq!("createdAt".parse::<SortKey>().unwrap(), SortKey::CreatedAt);
        assert_eq!("CREATEDAT".parse::<SortKey>().unwrap(), SortKey::CreatedAt);
        assert_eq!("Activity".parse::<SortKey>().unwrap(), SortKey::Activity);
        assert!("popularity".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_page_result_serializes_absent_cursor() {
        let page: PageResult<u8> = PageResult {
            items: vec![],
            count: 0,
            end: true,
            cursor: PageCursor::default(),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["cursor"]["id"], Value::Null);
        assert_eq!(json["end"], true);
    }
}
