//! Post service.
//!
//! Listing, lookup and the post lifecycle. Every mutation takes the caller's
//! identity explicitly and runs the access policy before touching the store.

use chrono::Utc;

use postboard_types::comment::{Comment, CreateCommentInput};
use postboard_types::error::PostError;
use postboard_types::listing::{ListingRequest, PageResult};
use postboard_types::post::{CreatePostInput, DeletedPost, Post, PostId, UpdatePostInput};
use postboard_types::user::{Caller, User, UserId};
use postboard_types::vote::{Vote, VoteDirection};

use crate::auth::AccessPolicy;
use crate::listing::ListingPlan;
use crate::repository::post::{NewComment, NewPost, PostRepository};

pub struct PostService<R: PostRepository, A: AccessPolicy> {
    posts: R,
    policy: A,
}

impl<R: PostRepository, A: AccessPolicy> PostService<R, A> {
    pub fn new(posts: R, policy: A) -> Self {
        Self { posts, policy }
    }

    /// Paginated, filtered, sorted feed. One store round-trip.
    pub async fn list_posts(&self, request: &ListingRequest) -> Result<PageResult<Post>, PostError> {
        let plan = ListingPlan::from_request(request);
        let rows = self.posts.find_many(&plan.options).await?;
        Ok(plan.shape(rows))
    }

    /// Same as `list_posts`, restricted to one author.
    pub async fn list_posts_by_author(
        &self,
        author: UserId,
        request: &ListingRequest,
    ) -> Result<PageResult<Post>, PostError> {
        let plan = ListingPlan::from_request(request);
        let options = plan.options.clone().scoped_to_author(author);
        let rows = self.posts.find_many(&options).await?;
        Ok(plan.shape(rows))
    }

    pub async fn get_post(&self, id: PostId) -> Result<Option<Post>, PostError> {
        Ok(self.posts.find_unique(id).await?)
    }

    /// Like `get_post`, but absence is an error.
    pub async fn require_post(&self, id: PostId) -> Result<Post, PostError> {
        self.get_post(id).await?.ok_or(PostError::NotFound)
    }

    pub async fn create_post(&self, caller: &Caller, input: CreatePostInput) -> Result<Post, PostError> {
        let author_id = self.policy.require_authenticated(caller)?;

        let new_post = NewPost {
            title: required_text("title", &input.title)?,
            body: required_text("body", &input.body)?,
            header_image_url: header_image(input.header_image_url.as_deref())?,
            author_id,
            created_at: Utc::now(),
        };

        let post = self.posts.create(&new_post).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");
        Ok(post)
    }

    pub async fn update_post(
        &self,
        caller: &Caller,
        id: PostId,
        input: UpdatePostInput,
    ) -> Result<Post, PostError> {
        self.policy.require_resource_owner(caller, id).await?;

        let mut post = self.require_post(id).await?;

        if let Some(title) = input.title {
            post.title = required_text("title", &title)?;
        }
        if let Some(body) = input.body {
            post.body = required_text("body", &body)?;
        }
        if let Some(url) = input.header_image_url {
            post.header_image_url = header_image(Some(&url))?;
        }
        post.updated_at = Utc::now();

        Ok(self.posts.update(&post).await?)
    }

    /// Delete a post, returning it with the author and votes it had.
    pub async fn delete_post(&self, caller: &Caller, id: PostId) -> Result<DeletedPost, PostError> {
        self.policy.require_resource_owner(caller, id).await?;

        let post = self.require_post(id).await?;
        let author = self.posts.author(id).await?;
        let votes = self.posts.votes(id).await?;

        self.posts.delete(id).await?;
        tracing::info!(post_id = %id, "post deleted");

        Ok(DeletedPost { post, author, votes })
    }

    pub async fn author(&self, id: PostId) -> Result<Option<User>, PostError> {
        Ok(self.posts.author(id).await?)
    }

    pub async fn comments(&self, id: PostId) -> Result<Vec<Comment>, PostError> {
        Ok(self.posts.comments(id).await?)
    }

    pub async fn votes(&self, id: PostId) -> Result<Vec<Vote>, PostError> {
        Ok(self.posts.votes(id).await?)
    }

    /// Number of comments on the post.
    pub async fn activity(&self, id: PostId) -> Result<u64, PostError> {
        Ok(self.posts.count_comments(id).await?)
    }

    pub async fn add_comment(
        &self,
        caller: &Caller,
        post_id: PostId,
        input: CreateCommentInput,
    ) -> Result<Comment, PostError> {
        let author_id = self.policy.require_authenticated(caller)?;
        let body = required_text("comment", &input.body)?;
        self.require_post(post_id).await?;

        let comment = NewComment {
            post_id,
            author_id,
            body,
            created_at: Utc::now(),
        };
        Ok(self.posts.add_comment(&comment).await?)
    }

    /// Record the caller's vote (replacing any earlier one) and return the
    /// post with its recomputed score.
    pub async fn cast_vote(
        &self,
        caller: &Caller,
        post_id: PostId,
        direction: VoteDirection,
    ) -> Result<Post, PostError> {
        let user_id = self.policy.require_authenticated(caller)?;
        self.require_post(post_id).await?;

        self.posts
            .upsert_vote(post_id, user_id, direction.value(), Utc::now())
            .await?;
        self.require_post(post_id).await
    }
}

fn required_text(field: &str, value: &str) -> Result<String, PostError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PostError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Empty means "no image". Anything else must be an absolute http(s) URL.
fn header_image(url: Option<&str>) -> Result<Option<String>, PostError> {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    let valid = ["http://", "https://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.to_lowercase().starts_with(scheme));
    if !valid || url.contains(char::is_whitespace) {
        return Err(PostError::InvalidInput(format!(
            "header image url '{url}' is not an http(s) url"
        )));
    }
    Ok(Some(url.to_string()))
}
