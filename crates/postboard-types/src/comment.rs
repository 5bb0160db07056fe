//! Comments and votes attached to posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::post::PostId;
use crate::user::UserId;

/// A comment on a post. The number of comments on a post is its "activity".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: PostId,
    pub author_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for adding a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentInput {
    pub body: String,
}
