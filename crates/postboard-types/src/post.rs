use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::user::UserId;

/// Unique identifier for a post (database row id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Rich-text body as produced by the editor (stored verbatim).
    pub body: String,
    /// Optional banner image shown above the post.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image_url: Option<String>,
    /// Sum of all vote values cast on this post.
    pub score: i64,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a post. The author comes from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub header_image_url: Option<String>,
}

/// Partial update for a post. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// `Some("")` clears the header image.
    #[serde(default)]
    pub header_image_url: Option<String>,
}

/// A post removed by `delete_post`, returned together with the relations
/// that were loaded before the row disappeared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPost {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<crate::user::User>,
    pub votes: Vec<crate::vote::Vote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_id_parse() {
        let id: PostId = " 42 ".parse().unwrap();
        assert_eq!(id, PostId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<PostId>().is_err());
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let now = Utc::now();
        let post = Post {
            id: PostId(1),
            title: "Hello".to_string(),
            body: "<p>World</p>".to_string(),
            header_image_url: None,
            score: 3,
            author_id: UserId(7),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["authorId"], 7);
        assert!(json.get("headerImageUrl").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_update_input_defaults() {
        let input: UpdatePostInput = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.body.is_none());
        assert!(input.header_image_url.is_none());
    }
}
