//! Query parameter extractor for the post listing endpoint.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use postboard_types::listing::ListingRequest;

/// Query parameters for `GET /api/v1/posts`.
///
/// Every value is kept as text; the listing builder decides what is a number.
#[derive(Debug, Deserialize, Default)]
pub struct PostListQuery {
    pub skip: Option<String>,
    pub take: Option<String>,
    /// Id of the post to start from.
    pub cursor: Option<String>,
    pub filter: Option<String>,
    /// Sort key: createdAt, activity or score.
    pub order_key: Option<String>,
    /// Sort order: asc or desc.
    pub order: Option<String>,
}

impl PostListQuery {
    pub fn into_listing_request(self) -> ListingRequest {
        let mut order_by = Map::new();
        if let Some(key) = self.order_key {
            order_by.insert("key".to_string(), Value::String(key));
        }
        if let Some(order) = self.order {
            order_by.insert("order".to_string(), Value::String(order));
        }

        ListingRequest {
            skip: self.skip.map(Value::String),
            take: self.take.map(Value::String),
            cursor: self.cursor.map(|id| json!({ "id": id })),
            filter: self.filter.map(Value::String),
            order_by: (!order_by.is_empty()).then_some(Value::Object(order_by)),
        }
    }
}
