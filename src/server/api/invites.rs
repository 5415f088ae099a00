use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireAuth;
use crate::invite;
use crate::server::AppState;
use crate::server::dto::PendingInvitesResponse;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

/// The caller's pending invitations of both kinds.
pub async fn list_pending(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let mentor_invites = state
        .store
        .list_pending_mentor_invites(auth.principal.id)
        .api_err("Failed to list mentor invites")?;
    let team_invites = state
        .store
        .list_pending_team_invites(auth.principal.id)
        .api_err("Failed to list team invites")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(PendingInvitesResponse {
        mentor_invites,
        team_invites,
    })))
}

pub async fn accept_mentor_invite(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let invite = invite::mentor::accept(state.store.as_ref(), id, auth.principal.id)
        .api_err("Failed to accept mentor invite")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(invite)))
}

pub async fn reject_mentor_invite(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let invite = invite::mentor::reject(state.store.as_ref(), id, auth.principal.id)
        .api_err("Failed to reject mentor invite")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(invite)))
}

pub async fn accept_team_invite(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let invite = invite::team::accept(state.store.as_ref(), id, auth.principal.id)
        .api_err("Failed to accept team invite")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(invite)))
}

pub async fn reject_team_invite(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let invite = invite::team::reject(state.store.as_ref(), id, auth.principal.id)
        .api_err("Failed to reject team invite")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(invite)))
}
