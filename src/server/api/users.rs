use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;

use crate::access::self_or_unrestricted;
use crate::auth::RequireAuth;
use crate::server::AppState;
use crate::server::dto::UpdatePrincipalRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{validate_email, validate_password, validate_username};

pub async fn me(auth: RequireAuth) -> impl IntoResponse {
    Json(ApiResponse::success(auth.principal))
}

pub async fn get_user(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let principal = state
        .store
        .get_principal(id)
        .api_err("Failed to get user")?
        .or_not_found("User not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(principal)))
}

pub async fn update_user(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePrincipalRequest>,
) -> impl IntoResponse {
    self_or_unrestricted(&auth.principal, id).into_result()?;

    let mut principal = state
        .store
        .get_principal(id)
        .api_err("Failed to get user")?
        .or_not_found("User not found")?;

    if let Some(username) = req.username {
        let username = username.trim();
        validate_username(username)?;
        principal.username = username.to_string();
    }
    if let Some(email) = req.email {
        let email = email.trim().to_lowercase();
        validate_email(&email)?;
        principal.email = email;
    }
    if let Some(password) = req.password {
        validate_password(&password)?;
        principal.password_hash = state
            .passwords
            .hash(&password)
            .api_err("Failed to hash password")?;
    }
    principal.updated_at = Utc::now();

    state
        .store
        .update_principal(&principal)
        .api_err("Failed to update user")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(principal)))
}
