//! Post repository trait definition.

use chrono::{DateTime, Utc};

use postboard_types::comment::Comment;
use postboard_types::error::RepositoryError;
use postboard_types::post::{Post, PostId};
use postboard_types::user::{User, UserId};
use postboard_types::vote::Vote;

use crate::listing::QueryOptions;

/// A validated post ready for insertion. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub header_image_url: Option<String>,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A validated comment ready for insertion.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for posts and their related collections.
///
/// Implementations live in postboard-infra (e.g., SqlitePostRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait PostRepository: Send + Sync {
    /// Execute a normalized listing query.
    ///
    /// Must honour every `Some` field of `options`: the filter, the author
    /// scope, the ordering (with `id ASC` as tie-break), then the cursor
    /// seek (start at the cursor row, inclusive), then `skip`, then `take`.
    fn find_many(
        &self,
        options: &QueryOptions,
    ) -> impl std::future::Future<Output = Result<Vec<Post>, RepositoryError>> + Send;

    fn find_unique(
        &self,
        id: PostId,
    ) -> impl std::future::Future<Output = Result<Option<Post>, RepositoryError>> + Send;

    /// Insert a post. Returns it with its assigned id and zero score.
    fn create(
        &self,
        post: &NewPost,
    ) -> impl std::future::Future<Output = Result<Post, RepositoryError>> + Send;

    /// Overwrite title, body, header image and `updated_at`.
    fn update(
        &self,
        post: &Post,
    ) -> impl std::future::Future<Output = Result<Post, RepositoryError>> + Send;

    /// Delete a post together with its comments and votes.
    fn delete(
        &self,
        id: PostId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The post's author, if both still exist.
    fn author(
        &self,
        id: PostId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Comments on a post, oldest first.
    fn comments(
        &self,
        id: PostId,
    ) -> impl std::future::Future<Output = Result<Vec<Comment>, RepositoryError>> + Send;

    fn votes(
        &self,
        id: PostId,
    ) -> impl std::future::Future<Output = Result<Vec<Vote>, RepositoryError>> + Send;

    /// Number of comments on a post (its "activity").
    fn count_comments(
        &self,
        id: PostId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    fn add_comment(
        &self,
        comment: &NewComment,
    ) -> impl std::future::Future<Output = Result<Comment, RepositoryError>> + Send;

    /// Insert or replace `user`'s vote on `post`, then set the post's score
    /// to the sum of its votes. Both happen atomically.
    fn upsert_vote(
        &self,
        post: PostId,
        user: UserId,
        value: i64,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vote, RepositoryError>> + Send;
}
