//! Post handlers: listing, lifecycle, comments and votes.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;

use postboard_types::comment::{Comment, CreateCommentInput};
use postboard_types::error::PostError;
use postboard_types::listing::{ListingRequest, PageResult};
use postboard_types::post::{CreatePostInput, DeletedPost, Post, PostId, UpdatePostInput};
use postboard_types::user::User;
use postboard_types::vote::{CastVoteInput, Vote};

use crate::http::error::AppError;
use crate::http::extractors::auth::CallerIdentity;
use crate::http::extractors::query::PostListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

fn post_link(id: PostId) -> String {
    format!("/api/v1/posts/{id}")
}

/// GET /api/v1/posts - Paginated, filtered, sorted feed.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> ApiResult<PageResult<Post>> {
    let start = Instant::now();
    let page = state
        .post_service
        .list_posts(&query.into_listing_request())
        .await?;

    Ok(ApiResponse::since(page, start)
        .with_link("self", "/api/v1/posts")
        .into_json())
}

/// POST /api/v1/posts/query - Same feed, with the full JSON listing request.
pub async fn query_posts(
    State(state): State<AppState>,
    Json(request): Json<ListingRequest>,
) -> ApiResult<PageResult<Post>> {
    let start = Instant::now();
    let page = state.post_service.list_posts(&request).await?;
    Ok(ApiResponse::since(page, start).into_json())
}

/// GET /api/v1/posts/{id}
pub async fn get_post(State(state): State<AppState>, Path(id): Path<PostId>) -> ApiResult<Post> {
    let start = Instant::now();
    let post = state.post_service.require_post(id).await?;

    let link = post_link(post.id);
    Ok(ApiResponse::since(post, start)
        .with_link("self", &link)
        .with_link("comments", &format!("{link}/comments"))
        .with_link("author", &format!("{link}/author"))
        .into_json())
}

/// POST /api/v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Json(body): Json<CreatePostInput>,
) -> ApiResult<Post> {
    let start = Instant::now();
    let post = state.post_service.create_post(&caller, body).await?;

    let link = post_link(post.id);
    Ok(ApiResponse::since(post, start).with_link("self", &link).into_json())
}

/// PUT /api/v1/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<PostId>,
    Json(body): Json<UpdatePostInput>,
) -> ApiResult<Post> {
    let start = Instant::now();
    let post = state.post_service.update_post(&caller, id, body).await?;
    Ok(ApiResponse::since(post, start).with_link("self", &post_link(id)).into_json())
}

/// DELETE /api/v1/posts/{id} - Returns the removed post with its author and votes.
pub async fn delete_post(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<PostId>,
) -> ApiResult<DeletedPost> {
    let start = Instant::now();
    let deleted = state.post_service.delete_post(&caller, id).await?;
    Ok(ApiResponse::since(deleted, start).into_json())
}

/// GET /api/v1/posts/{id}/author
pub async fn get_author(State(state): State<AppState>, Path(id): Path<PostId>) -> ApiResult<User> {
    let start = Instant::now();
    let author = state.post_service.author(id).await?.ok_or(PostError::NotFound)?;
    Ok(ApiResponse::since(author, start).into_json())
}

/// GET /api/v1/posts/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> ApiResult<Vec<Comment>> {
    let start = Instant::now();
    state.post_service.require_post(id).await?;
    let comments = state.post_service.comments(id).await?;
    Ok(ApiResponse::since(comments, start).into_json())
}

/// POST /api/v1/posts/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<PostId>,
    Json(body): Json<CreateCommentInput>,
) -> ApiResult<Comment> {
    let start = Instant::now();
    let comment = state.post_service.add_comment(&caller, id, body).await?;
    Ok(ApiResponse::since(comment, start).into_json())
}

/// GET /api/v1/posts/{id}/votes
pub async fn list_votes(State(state): State<AppState>, Path(id): Path<PostId>) -> ApiResult<Vec<Vote>> {
    let start = Instant::now();
    state.post_service.require_post(id).await?;
    let votes = state.post_service.votes(id).await?;
    Ok(ApiResponse::since(votes, start).into_json())
}

/// POST /api/v1/posts/{id}/votes - Returns the post with its new score.
pub async fn cast_vote(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<PostId>,
    Json(body): Json<CastVoteInput>,
) -> ApiResult<Post> {
    let start = Instant::now();
    let post = state
        .post_service
        .cast_vote(&caller, id, body.direction)
        .await?;
    Ok(ApiResponse::since(post, start).with_link("self", &post_link(id)).into_json())
}
