use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::access::team_viewer;
use crate::access::{hackathon_member, hackathon_role_at_least, team_role_at_least};
use crate::auth::RequireAuth;
use crate::invite;
use crate::server::AppState;
use crate::server::dto::{CreateInviteRequest, CreateScoreRequest, TeamResponse};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_score;
use crate::store::Store;
use crate::types::{HackathonRole, Team, TeamRole};

fn load_team(store: &dyn Store, id: i64) -> Result<Team, ApiError> {
    store
        .get_team(id)
        .api_err("Failed to get team")?
        .or_not_found("Team not found")
}

pub async fn get_team(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let team = load_team(store, id)?;

    hackathon_member(store, auth.principal.id, team.hackathon_id)
        .api_err("Failed to check membership")?
        .into_result()?;

    let members = store
        .list_team_members(team.id)
        .api_err("Failed to list team members")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(TeamResponse { team, members })))
}

/// Only the captain may invite; the invite itself enforces the hackathon rules.
pub async fn create_invite(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateInviteRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let team = load_team(store, id)?;

    team_role_at_least(store, auth.principal.id, team.id, TeamRole::Captain)
        .api_err("Failed to check team role")?
        .into_result()?;

    let invite = invite::team::create(store, auth.principal.id, req.invitee_id, team.id)
        .api_err("Failed to create team invite")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(invite))))
}

pub async fn list_scores(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let team = load_team(store, id)?;

    team_viewer(store, auth.principal.id, &team)
        .api_err("Failed to check team access")?
        .into_result()?;

    let scores = store
        .list_team_scores(team.id)
        .api_err("Failed to list scores")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(scores)))
}

pub async fn create_score(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateScoreRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let team = load_team(store, id)?;

    hackathon_role_at_least(
        store,
        auth.principal.id,
        team.hackathon_id,
        HackathonRole::Mentor,
    )
    .api_err("Failed to check hackathon role")?
    .into_result()?;

    validate_score(req.value)?;

    let comment = req
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let score = store
        .create_score(team.id, auth.principal.id, req.value, comment)
        .api_err("Failed to create score")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(score))))
}
