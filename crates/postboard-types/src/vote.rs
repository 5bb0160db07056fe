use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::post::PostId;
use crate::user::UserId;

/// A single user's vote on a post. At most one per (post, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: i64,
    pub post_id: PostId,
    pub user_id: UserId,
    /// Either `1` or `-1`.
    pub value: i64,
    pub created_at: DateTime<Utc>,
}

/// Direction of a vote as submitted by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn value(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastVoteInput {
    pub direction: VoteDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_direction_value() {
        assert_eq!(VoteDirection::Up.value(), 1);
        assert_eq!(VoteDirection::Down.value(), -1);
    }

    #[test]
    fn test_cast_vote_input_parse() {
        let input: CastVoteInput = serde_json::from_str(r#"{"direction":"down"}"#).unwrap();
        assert_eq!(input.direction, VoteDirection::Down);
    }
}
