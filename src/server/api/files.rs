use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::access::{file_read, file_write, owner_exists};
use crate::auth::RequireAuth;
use crate::server::AppState;
use crate::server::dto::CreateFileRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_title;
use crate::types::NewFile;

/// Records metadata for a file that was already uploaded to `storage_key`.
pub async fn create_file(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFileRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let name = req.name.trim();
    validate_title(name, "File")?;
    if req.content_type.trim().is_empty() {
        return Err(ApiError::bad_request("Content type cannot be empty"));
    }
    if req.storage_key.trim().is_empty() {
        return Err(ApiError::bad_request("Storage key cannot be empty"));
    }
    if req.size_bytes < 0 {
        return Err(ApiError::bad_request("File size cannot be negative"));
    }

    // Guard first: a missing owner must look the same as one the caller
    // cannot write to.
    file_write(store, &auth.principal, req.owner)
        .api_err("Failed to check file access")?
        .into_result()?;

    if !owner_exists(store, req.owner).api_err("Failed to look up file owner")? {
        return Err(ApiError::not_found(format!("{} not found", req.owner.kind())));
    }

    let file = store
        .create_file(&NewFile {
            owner: req.owner,
            name: name.to_string(),
            content_type: req.content_type.trim().to_string(),
            size_bytes: req.size_bytes,
            storage_key: req.storage_key.trim().to_string(),
            uploaded_by: auth.principal.id,
        })
        .api_err("Failed to record file")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(file))))
}

pub async fn get_file(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let file = store
        .get_file(id)
        .api_err("Failed to get file")?
        .or_not_found("File not found")?;

    file_read(store, &auth.principal, file.owner)
        .api_err("Failed to check file access")?
        .into_result()?;

    Ok::<_, ApiError>(Json(ApiResponse::success(file)))
}
