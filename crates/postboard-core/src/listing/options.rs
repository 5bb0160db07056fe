//! Per-concern query fragments and their merge into `QueryOptions`.
//!
//! Each fragment is built independently from a `ListingRequest`. A fragment
//! that the request does not specify is `None`, never a half-filled value.

use postboard_types::listing::{ListingRequest, SortDirection, SortKey};
use postboard_types::post::PostId;
use postboard_types::user::UserId;
use serde_json::Value;

/// Offset/cursor pagination requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOptions {
    pub skip: i64,
    /// Page size the client wants.
    pub take: i64,
    /// Seek start; only set when the client sent a numeric id.
    pub cursor: Option<PostId>,
}

impl PaginationOptions {
    /// Active iff both `skip` and `take` are valid numbers.
    pub fn from_request(request: &ListingRequest) -> Option<Self> {
        let skip = request.skip.as_ref().and_then(as_integer)?;
        let take = request.take.as_ref().and_then(as_integer)?;

        let cursor = request.cursor_id().and_then(as_integer).map(PostId);

        Some(Self {
            skip: skip.max(0),
            take: take.max(0),
            cursor,
        })
    }

    /// Rows to ask the store for: one more than the page size, so a full
    /// extra row means more records remain.
    pub fn fetch_limit(&self) -> i64 {
        self.take.saturating_add(1)
    }
}

/// Case folding shared by the filter needle and the stored search columns.
///
/// Unicode-aware, so "Über" and "über" fold to the same text. Stores must
/// compare against text folded by this function, not by their own `lower()`.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Case-insensitive substring match against post title OR body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Needle, already passed through [`fold_case`].
    pub contains: String,
}

impl FilterOptions {
    pub fn from_request(request: &ListingRequest) -> Option<Self> {
        match request.filter.as_ref() {
            Some(Value::String(s)) if !s.is_empty() => Some(Self {
                contains: fold_case(s),
            }),
            _ => None,
        }
    }

    pub fn matches(&self, title: &str, body: &str) -> bool {
        fold_case(title).contains(&self.contains) || fold_case(body).contains(&self.contains)
    }
}

/// Effective ordering. Ties always break on `id` ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOptions {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortOptions {
    /// Newest first.
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortOptions {
    /// Both key and direction must be recognized; otherwise the default applies.
    pub fn from_request(request: &ListingRequest) -> Self {
        let key = request
            .order_key()
            .and_then(Value::as_str)
            .and_then(|k| k.parse::<SortKey>().ok());
        let direction = request
            .order_direction()
            .and_then(Value::as_str)
            .and_then(|o| o.parse::<SortDirection>().ok());

        match (key, direction) {
            (Some(key), Some(direction)) => Self { key, direction },
            _ => Self::default(),
        }
    }
}

/// Normalized options handed to `PostRepository::find_many`.
///
/// Only fields the request actually specified are `Some`. `take` here is the
/// number of rows to fetch (page size + 1), not the page size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub skip: Option<i64>,
    pub take: Option<i64>,
    pub cursor: Option<PostId>,
    pub filter: Option<FilterOptions>,
    /// Restrict to one author's posts (profile pages).
    pub author: Option<UserId>,
    pub order_by: SortOptions,
}

impl QueryOptions {
    /// Field-by-field merge of the independent fragments.
    pub fn merge(
        pagination: Option<&PaginationOptions>,
        filter: Option<FilterOptions>,
        order_by: SortOptions,
    ) -> Self {
        Self {
            skip: pagination.map(|p| p.skip),
            take: pagination.map(PaginationOptions::fetch_limit),
            cursor: pagination.and_then(|p| p.cursor),
            filter,
            author: None,
            order_by,
        }
    }

    pub fn scoped_to_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }
}

/// Read an integer out of a loosely typed value.
///
/// Accepts JSON integers, floats with no fractional part, and numeric strings.
/// Anything else (null, booleans, objects, "abc", 2.5) is not a number.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_integer() {
        assert_eq!(as_integer(&json!(3)), Some(3));
        assert_eq!(as_integer(&json!(4.0)), Some(4));
        assert_eq!(as_integer(&json!("12")), Some(12));
        assert_eq!(as_integer(&json!(" 7 ")), Some(7));
        assert_eq!(as_integer(&json!(2.5)), None);
        assert_eq!(as_integer(&json!("abc")), None);
        assert_eq!(as_integer(&json!("")), None);
        assert_eq!(as_integer(&Value::Null), None);
        assert_eq!(as_integer(&json!(true)), None);
    }

    #[test]
    fn test_pagination_requires_both_skip_and_take() {
        let only_take = ListingRequest {
            take: Some(json!(10)),
            ..Default::default()
        };
        assert!(PaginationOptions::from_request(&only_take).is_none());

        let bad_skip = ListingRequest {
            skip: Some(json!("first")),
            take: Some(json!(10)),
            ..Default::default()
        };
        assert!(PaginationOptions::from_request(&bad_skip).is_none());

        let page = PaginationOptions::from_request(&ListingRequest::page(20, 10)).unwrap();
        assert_eq!(page.skip, 20);
        assert_eq!(page.take, 10);
        assert_eq!(page.fetch_limit(), 11);
        assert!(page.cursor.is_none());
    }

    #[test]
    fn test_pagination_negative_values_clamp_to_zero() {
        let page = PaginationOptions::from_request(&ListingRequest::page(-5, -1)).unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.take, 0);
        assert_eq!(page.fetch_limit(), 1);
    }

    #[test]
    fn test_cursor_kept_only_when_numeric() {
        let with_cursor = ListingRequest::page(0, 5).with_cursor(17);
        let page = PaginationOptions::from_request(&with_cursor).unwrap();
        assert_eq!(page.cursor, Some(PostId(17)));

        let mut placeholder = ListingRequest::page(0, 5);
        placeholder.cursor = Some(json!({ "id": null }));
        let page = PaginationOptions::from_request(&placeholder).unwrap();
        assert!(page.cursor.is_none());

        let garbage = ListingRequest::page(0, 5).with_cursor("abc");
        let page = PaginationOptions::from_request(&garbage).unwrap();
        assert!(page.cursor.is_none());

        let mut bare = ListingRequest::page(0, 5);
        bare.cursor = Some(json!(17));
        let page = PaginationOptions::from_request(&bare).unwrap();
        assert!(page.cursor.is_none());
    }

    #[test]
    fn test_filter_ignores_empty_and_non_string() {
        assert!(FilterOptions::from_request(&ListingRequest::default().with_filter("")).is_none());

        let numeric = ListingRequest {
            filter: Some(json!(12)),
            ..Default::default()
        };
        assert!(FilterOptions::from_request(&numeric).is_none());

        let filter = FilterOptions::from_request(&ListingRequest::default().with_filter("Cat")).unwrap();
        assert_eq!(filter.contains, "cat");
        assert!(filter.matches("Concatenate", ""));
        assert!(filter.matches("Dogs", "my CAT sleeps"));
        assert!(!filter.matches("Dogs", "birds"));

        let filter = FilterOptions::from_request(&ListingRequest::default().with_filter("ÉCOLE")).unwrap();
        assert_eq!(filter.contains, "école");
        assert!(filter.matches("Über Café", "ÉCOLE"));
        assert!(filter.matches("", "une École"));
    }

    #[test]
    fn test_sort_recognized_keys() {
        let sort = SortOptions::from_request(&ListingRequest::default().with_order("activity", "asc"));
        assert_eq!(sort.key, SortKey::Activity);
        assert_eq!(sort.direction, SortDirection::Asc);

        let sort = SortOptions::from_request(&ListingRequest::default().with_order("score", "desc"));
        assert_eq!(sort.key, SortKey::Score);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_falls_back_to_newest_first() {
        assert_eq!(SortOptions::from_request(&ListingRequest::default()), SortOptions::default());

        let bad_key = ListingRequest::default().with_order("popularity", "asc");
        assert_eq!(SortOptions::from_request(&bad_key), SortOptions::default());

        let bad_order = ListingRequest::default().with_order("score", "sideways");
        assert_eq!(SortOptions::from_request(&bad_order), SortOptions::default());

        let missing_order = ListingRequest {
            order_by: Some(json!({ "key": "score" })),
            ..Default::default()
        };
        let sort = SortOptions::from_request(&missing_order);
        assert_eq!(sort.key, SortKey::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Desc);

        for shape in [json!("score"), json!(["score", "asc"]), json!(null)] {
            let request = ListingRequest {
                order_by: Some(shape),
                ..Default::default()
            };
            assert_eq!(SortOptions::from_request(&request), SortOptions::default());
        }
    }

    #[test]
    fn test_merge_omits_unspecified_fragments() {
        let options = QueryOptions::merge(None, None, SortOptions::default());
        assert_eq!(options.skip, None);
        assert_eq!(options.take, None);
        assert_eq!(options.cursor, None);
        assert_eq!(options.filter, None);
        assert_eq!(options.author, None);
        assert_eq!(options.order_by.key, SortKey::CreatedAt);
    }
}
