//! Caller identity extractor.
//!
//! Reads an API token from:
//! - `Authorization: Bearer <token>` header
//! - `X-API-Key: <token>` header
//!
//! No token means an anonymous caller; services decide whether that is
//! enough. A token that does not match any user is rejected outright.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use postboard_types::user::Caller;

use crate::http::error::AppError;
use crate::state::AppState;

/// The identity of whoever sent the request.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub Caller);

impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_token(parts)? else {
            return Ok(CallerIdentity(Caller::Anonymous));
        };

        match state.user_service.authenticate(&token).await? {
            Some(user) => {
                tracing::debug!(user_id = %user.id, "request authenticated");
                Ok(CallerIdentity(Caller::from(&user)))
            }
            None => Err(AppError::Unauthorized(
                "Invalid API token. Provide a valid token via 'Authorization: Bearer <token>' or 'X-API-Key: <token>' header.".to_string(),
            )),
        }
    }
}

/// Extract the token from request headers, if one was sent.
fn extract_token(parts: &Parts) -> Result<Option<String>, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(Some(token.trim().to_string()));
        }
    }

    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(Some(key_str.trim().to_string()));
    }

    Ok(None)
}
