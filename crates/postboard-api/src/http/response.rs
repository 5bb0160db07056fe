//! The JSON envelope every `/api/v1` endpoint answers with.
//!
//! ```json
//! {
//!   "data": { "items": [...], "count": 10, "end": false, "cursor": { "id": 42 } },
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 2 },
//!   "_links": { "self": "/api/v1/posts" }
//! }
//! ```
//!
//! Failures carry `errors` instead of `data`; see [`super::error::AppError`].

use std::collections::HashMap;
use std::time::Instant;

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub meta: ApiMeta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(rename = "_links", skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ApiMeta {
    pub request_id: String,
    pub timestamp: String,
    pub response_time_ms: u64,
}

impl ApiMeta {
    fn new(request_id: String, response_time_ms: u64) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_time_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Stable, upper-snake-case code such as `NOT_FOUND`.
    pub code: String,
    pub message: String,
}

fn next_request_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, request_id: String, response_time_ms: u64) -> Self {
        Self {
            data: Some(data),
            meta: ApiMeta::new(request_id, response_time_ms),
            errors: Vec::new(),
            links: HashMap::new(),
        }
    }

    /// Success envelope timed from `start`.
    pub fn since(data: T, start: Instant) -> Self {
        Self::success(data, next_request_id(), start.elapsed().as_millis() as u64)
    }

    pub fn with_link(mut self, rel: &str, href: &str) -> Self {
        self.links.insert(rel.to_string(), href.to_string());
        self
    }

    pub fn into_json(self) -> Json<Self> {
        Json(self)
    }
}

impl ApiResponse<()> {
    pub fn failure(code: &str, message: String) -> Self {
        Self {
            data: None,
            meta: ApiMeta::new(next_request_id(), 0),
            errors: vec![ApiErrorDetail {
                code: code.to_string(),
                message,
            }],
            links: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let resp = ApiResponse::success(vec![1, 2], "req-1".to_string(), 3)
            .with_link("self", "/api/v1/posts");
        let body = serde_json::to_value(&resp).unwrap();
        assert_eq!(body["data"], json!([1, 2]));
        assert_eq!(body["meta"]["request_id"], "req-1");
        assert_eq!(body["_links"]["self"], "/api/v1/posts");
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::failure("NOT_FOUND", "post not found".into()))
            .unwrap();
        assert!(body.get("data").is_none());
        assert_eq!(body["errors"], json!([{ "code": "NOT_FOUND", "message": "post not found" }]));
        assert_eq!(body["meta"]["request_id"].as_str().unwrap().len(), 36);
    }
}
