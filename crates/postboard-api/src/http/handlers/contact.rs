//! Contact request handlers. Submitting is public; reading is for admins.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use postboard_types::contact::{Contact, CreateContactInput};

use crate::http::error::AppError;
use crate::http::extractors::auth::CallerIdentity;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/contacts
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(body): Json<CreateContactInput>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    let contact = state.contact_service.submit_contact(body).await?;
    Ok(ApiResponse::since(contact, start).into_json())
}

/// GET /api/v1/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
) -> Result<Json<ApiResponse<Vec<Contact>>>, AppError> {
    let start = Instant::now();
    let contacts = state.contact_service.list_contacts(&caller).await?;
    Ok(ApiResponse::since(contacts, start).into_json())
}

/// DELETE /api/v1/contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let start = Instant::now();
    state.contact_service.delete_contact(&caller, id).await?;
    Ok(ApiResponse::since(json!({ "deleted": id }), start).into_json())
}
