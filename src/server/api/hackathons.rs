use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::access::hackathon_member;
use crate::auth::RequireAuth;
use crate::chat::{ChatMode, check_chat_access};
use crate::invite;
use crate::server::AppState;
use crate::server::dto::{CreateInviteRequest, CreateTeamRequest, TeamResponse};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_title;
use crate::store::Store;
use crate::types::{Hackathon, HackathonMembership, HackathonRole};

fn load_hackathon(store: &dyn Store, id: i64) -> Result<Hackathon, ApiError> {
    store
        .get_hackathon(id)
        .api_err("Failed to get hackathon")?
        .or_not_found("Hackathon not found")
}

pub async fn get_hackathon(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let hackathon = load_hackathon(state.store.as_ref(), id)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(hackathon)))
}

pub async fn register(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let hackathon = load_hackathon(store, id)?;

    let membership = HackathonMembership {
        principal_id: auth.principal.id,
        hackathon_id: hackathon.id,
        role: HackathonRole::Member,
        created_at: Utc::now(),
    };
    store
        .insert_hackathon_membership(&membership)
        .api_err("Failed to register")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(membership))))
}

pub async fn list_members(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let hackathon = load_hackathon(store, id)?;

    hackathon_member(store, auth.principal.id, hackathon.id)
        .api_err("Failed to check membership")?
        .into_result()?;

    let members = store
        .list_hackathon_members(hackathon.id)
        .api_err("Failed to list members")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(members)))
}

/// Lists the chats of a hackathon the caller can read.
pub async fn list_chats(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let hackathon = load_hackathon(store, id)?;

    hackathon_member(store, auth.principal.id, hackathon.id)
        .api_err("Failed to check membership")?
        .into_result()?;

    let mut chats = Vec::new();
    for chat in store
        .list_hackathon_chats(hackathon.id)
        .api_err("Failed to list chats")?
    {
        if check_chat_access(store, auth.principal.id, &chat, ChatMode::Read)
            .api_err("Failed to check chat access")?
            .is_allowed()
        {
            chats.push(chat);
        }
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(chats)))
}

pub async fn list_teams(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let hackathon = load_hackathon(store, id)?;

    hackathon_member(store, auth.principal.id, hackathon.id)
        .api_err("Failed to check membership")?
        .into_result()?;

    let teams = store
        .list_hackathon_teams(hackathon.id)
        .api_err("Failed to list teams")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(teams)))
}

pub async fn create_team(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateTeamRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let hackathon = load_hackathon(store, id)?;

    hackathon_member(store, auth.principal.id, hackathon.id)
        .api_err("Failed to check membership")?
        .into_result()?;

    if store
        .find_team_membership_in_hackathon(auth.principal.id, hackathon.id)
        .api_err("Failed to check team membership")?
        .is_some()
    {
        return Err(ApiError::conflict("Already on a team in this hackathon"));
    }

    let name = req.name.trim();
    validate_title(name, "Team")?;

    let team = store
        .create_team(hackathon.id, name, auth.principal.id)
        .api_err("Failed to create team")?;
    let members = store
        .list_team_members(team.id)
        .api_err("Failed to list team members")?;

    tracing::info!(
        "Team {} created in hackathon {} by principal {}",
        team.id,
        hackathon.id,
        auth.principal.id
    );

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(TeamResponse { team, members })),
    ))
}

pub async fn create_mentor_invite(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateInviteRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let hackathon = load_hackathon(store, id)?;

    let invite = invite::mentor::create(store, auth.principal.id, req.invitee_id, hackathon.id)
        .api_err("Failed to create mentor invite")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(invite))))
}
