use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::auth::revoke;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{LoginRequest, RefreshRequest, SessionResponse, SignupRequest};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{validate_email, validate_password, validate_username};
use crate::types::SystemRole;

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> impl IntoResponse {
    let username = req.username.trim();
    let email = req.email.trim().to_lowercase();
    validate_username(username)?;
    validate_email(&email)?;
    validate_password(&req.password)?;

    let hash = state
        .passwords
        .hash(&req.password)
        .api_err("Failed to hash password")?;

    let principal = state
        .store
        .create_principal(username, &email, &hash, SystemRole::Normal)
        .api_err("Failed to create account")?;

    let tokens = state
        .tokens
        .issue(&principal)
        .api_err("Failed to issue tokens")?;

    tracing::info!("Principal {} signed up as {}", principal.id, principal.username);

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(SessionResponse { principal, tokens })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let login = req.login.trim();
    let principal = state
        .store
        .get_principal_by_login(login)
        .api_err("Failed to look up account")?
        .ok_or(ApiError::from(Error::InvalidCredentials))?;

    let verified = state
        .passwords
        .verify(&req.password, &principal.password_hash)
        .api_err("Failed to verify password")?;
    if !verified {
        tracing::debug!("Failed login for principal {}", principal.id);
        return Err(ApiError::from(Error::InvalidCredentials));
    }

    let tokens = state
        .tokens
        .issue(&principal)
        .api_err("Failed to issue tokens")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(SessionResponse { principal, tokens })))
}

/// Exchanges a refresh token for a fresh pair. The presented refresh token
/// stays valid until it expires or is logged out.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = state
        .tokens
        .validate_refresh(&req.refresh_token, state.revocations.as_ref())
        .api_err("Failed to validate token")?;

    let principal = state
        .store
        .get_principal(claims.sub)
        .api_err("Failed to look up account")?
        .ok_or(ApiError::from(Error::InvalidToken))?;

    let tokens = state
        .tokens
        .issue(&principal)
        .api_err("Failed to issue tokens")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(SessionResponse { principal, tokens })))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = state
        .tokens
        .validate_refresh(&req.refresh_token, state.revocations.as_ref())
        .api_err("Failed to validate token")?;

    revoke(state.revocations.as_ref(), &claims.jti, claims.expires_at())
        .api_err("Failed to revoke token")?;

    tracing::info!("Principal {} logged out", claims.sub);

    Ok::<_, ApiError>(Json(ApiResponse::success(json!({ "revoked": true }))))
}
