//! HTTP routes. The JSON API lives under `/api/v1/`, next to `/health`.
//!
//! When the configured `web_dir` exists, the built SPA is served from it.
//! API routes take priority; unknown paths fall through to the SPA's
//! `index.html` for client-side routing.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let web_dir = state.config.web_dir.clone();

    let api_routes = Router::new()
        // Posts
        .route(
            "/posts",
            get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route("/posts/query", post(handlers::post::query_posts))
        .route(
            "/posts/{id}",
            get(handlers::post::get_post)
                .put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route("/posts/{id}/author", get(handlers::post::get_author))
        .route(
            "/posts/{id}/comments",
            get(handlers::post::list_comments).post(handlers::post::add_comment),
        )
        .route(
            "/posts/{id}/votes",
            get(handlers::post::list_votes).post(handlers::post::cast_vote),
        )
        // Users
        .route("/users/{username}", get(handlers::user::get_user))
        .route("/users/{username}/posts", get(handlers::user::list_user_posts))
        // Contact requests
        .route(
            "/contacts",
            get(handlers::contact::list_contacts).post(handlers::contact::submit_contact),
        )
        .route("/contacts/{id}", delete(handlers::contact::delete_contact));

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if std::path::Path::new(&web_dir).exists() {
        let index_path = format!("{web_dir}/index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "serving web client");
    }

    router
}

/// `GET /health`, unauthenticated.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use postboard_infra::sqlite::pool::DatabasePool;
    use postboard_types::config::GlobalConfig;
    use postboard_types::user::{CreateUserRequest, Role};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        state: AppState,
        _dir: tempfile::TempDir,
    }

    async fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        let config = GlobalConfig {
            web_dir: dir.path().join("no-web").display().to_string(),
            ..Default::default()
        };
        let state = AppState::with_pool(pool, dir.path().to_path_buf(), config);
        TestApp {
            router: build_router(state.clone()),
            state,
            _dir: dir,
        }
    }

    async fn token_for(app: &TestApp, username: &str, roles: Vec<Role>) -> String {
        app.state
            .user_service
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                roles,
            })
            .await
            .unwrap()
            .token
    }

    async fn send(
        app: &TestApp,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create_post(app: &TestApp, token: &str, title: &str, body: &str) -> i64 {
        let (status, json) = send(
            app,
            "POST",
            "/api/v1/posts",
            Some(token),
            Some(json!({ "title": title, "body": body })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        json["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, json) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_requires_authentication() {
        let app = test_app().await;
        let (status, json) = send(
            &app,
            "POST",
            "/api/v1/posts",
            None,
            Some(json!({ "title": "t", "body": "b" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["errors"][0]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let app = test_app().await;
        let (status, _) = send(&app, "GET", "/api/v1/contacts", Some("pb_bogus"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_paginated_filtered_listing() {
        let app = test_app().await;
        let token = token_for(&app, "ada", vec![]).await;
        create_post(&app, &token, "My cat", "meow").await;
        create_post(&app, &token, "Dogs", "woof").await;
        create_post(&app, &token, "Cat facts", "more").await;
        create_post(&app, &token, "Catalogue", "items").await;

        let (status, json) = send(
            &app,
            "GET",
            "/api/v1/posts?skip=0&take=2&filter=CAT",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let page = &json["data"];
        assert_eq!(page["count"], 2);
        assert_eq!(page["end"], false);
        assert_eq!(page["items"].as_array().unwrap().len(), 2);
        assert_eq!(page["items"][0]["title"], "Catalogue");
        assert_eq!(page["cursor"]["id"], page["items"][1]["id"]);

        let (_, json) = send(
            &app,
            "GET",
            "/api/v1/posts?skip=2&take=2&filter=cat",
            None,
            None,
        )
        .await;
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["data"]["end"], true);
        assert_eq!(json["data"]["items"][0]["title"], "My cat");
    }

    #[tokio::test]
    async fn test_query_endpoint_tolerates_malformed_input() {
        let app = test_app().await;
        let token = token_for(&app, "ada", vec![]).await;
        create_post(&app, &token, "one", "x").await;
        create_post(&app, &token, "two", "x").await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/v1/posts/query",
            None,
            Some(json!({
                "skip": 0,
                "take": 1,
                "cursor": { "id": "not-a-number" },
                "orderBy": { "key": "popularity", "order": "asc" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["data"]["end"], false);
        // Invalid sort falls back to newest first.
        assert_eq!(json["data"]["items"][0]["title"], "two");
    }

    #[tokio::test]
    async fn test_query_endpoint_ignores_misshapen_cursor_and_order() {
        let app = test_app().await;
        let token = token_for(&app, "ada", vec![]).await;
        create_post(&app, &token, "one", "x").await;
        create_post(&app, &token, "two", "x").await;

        // Equal scores: a sort by score would list "one" first (id tie-break).
        for body in [
            json!({ "skip": 0, "take": 2, "cursor": "abc", "orderBy": "score" }),
            json!({ "skip": 0, "take": 2, "cursor": [1], "orderBy": ["score", "asc"] }),
        ] {
            let (status, json) = send(&app, "POST", "/api/v1/posts/query", None, Some(body)).await;
            assert_eq!(status, StatusCode::OK, "{json}");
            assert_eq!(json["data"]["count"], 2);
            assert_eq!(json["data"]["end"], true);
            assert_eq!(json["data"]["items"][0]["title"], "two");
            assert_eq!(json["data"]["items"][1]["title"], "one");
        }
    }

    #[tokio::test]
    async fn test_only_owner_may_update() {
        let app = test_app().await;
        let ada = token_for(&app, "ada", vec![]).await;
        let grace = token_for(&app, "grace", vec![]).await;
        let id = create_post(&app, &ada, "Mine", "body").await;
        let uri = format!("/api/v1/posts/{id}");

        let (status, _) = send(&app, "PUT", &uri, Some(&grace), Some(json!({ "title": "Hers" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(&app, "PUT", &uri, Some(&ada), Some(json!({ "title": "Still mine" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["title"], "Still mine");

        let (status, _) = send(&app, "PUT", "/api/v1/posts/9999", Some(&ada), Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_votes_comments_and_delete() {
        let app = test_app().await;
        let ada = token_for(&app, "ada", vec![]).await;
        let grace = token_for(&app, "grace", vec![]).await;
        let id = create_post(&app, &ada, "Vote me", "body").await;
        let uri = format!("/api/v1/posts/{id}");

        let (status, json) = send(&app, "POST", &format!("{uri}/votes"), Some(&grace), Some(json!({ "direction": "up" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["score"], 1);

        let (status, _) = send(&app, "POST", &format!("{uri}/comments"), Some(&grace), Some(json!({ "body": "nice" }))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(&app, "GET", &format!("{uri}/comments"), None, None).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (_, json) = send(&app, "GET", &format!("{uri}/author"), None, None).await;
        assert_eq!(json["data"]["username"], "ada");

        let (status, json) = send(&app, "DELETE", &uri, Some(&ada), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["author"]["username"], "ada");
        assert_eq!(json["data"]["votes"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_contacts_are_admin_only() {
        let app = test_app().await;
        let member = token_for(&app, "ada", vec![]).await;
        let admin = token_for(&app, "root", vec![Role::Admin]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/v1/contacts",
            None,
            Some(json!({ "name": "Jo", "phone": "+1 555 0100", "message": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        let contact_id = json["data"]["id"].as_i64().unwrap();

        let (status, _) = send(&app, "GET", "/api/v1/contacts", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&app, "GET", "/api/v1/contacts", Some(&member), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(&app, "GET", "/api/v1/contacts", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let uri = format!("/api/v1/contacts/{contact_id}");
        let (status, _) = send(&app, "DELETE", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "DELETE", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_profile_and_posts() {
        let app = test_app().await;
        let ada = token_for(&app, "ada", vec![]).await;
        let grace = token_for(&app, "grace", vec![]).await;
        create_post(&app, &ada, "ada's", "x").await;
        create_post(&app, &grace, "grace's", "x").await;

        let (status, json) = send(&app, "GET", "/api/v1/users/ada", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["username"], "ada");

        let (_, json) = send(&app, "GET", "/api/v1/users/ada/posts", None, None).await;
        let items = json["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "ada's");

        let (status, _) = send(&app, "GET", "/api/v1/users/nobody", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
