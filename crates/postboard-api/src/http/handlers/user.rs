//! User profile handlers.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;

use postboard_types::listing::PageResult;
use postboard_types::post::Post;
use postboard_types::user::User;

use crate::http::error::AppError;
use crate::http::extractors::query::PostListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/{username}
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let start = Instant::now();
    let user = state.user_service.get_user_by_username(&username).await?;

    let posts = format!("/api/v1/users/{}/posts", user.username);
    Ok(ApiResponse::since(user, start).with_link("posts", &posts).into_json())
}

/// GET /api/v1/users/{username}/posts - The user's posts, same query as the feed.
pub async fn list_user_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<ApiResponse<PageResult<Post>>>, AppError> {
    let start = Instant::now();
    let user = state.user_service.get_user_by_username(&username).await?;
    let page = state
        .post_service
        .list_posts_by_author(user.id, &query.into_listing_request())
        .await?;
    Ok(ApiResponse::since(page, start).into_json())
}
