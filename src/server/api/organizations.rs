use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::access::organization_owner;
use crate::auth::RequireAuth;
use crate::server::AppState;
use crate::server::dto::{
    CreateHackathonRequest, CreateOrganizationRequest, UpdateOrganizationRequest,
};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_title;
use crate::types::NewHackathon;

pub async fn create_organization(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrganizationRequest>,
) -> impl IntoResponse {
    let name = req.name.trim();
    validate_title(name, "Organization")?;

    let org = state
        .store
        .create_organization(name, auth.principal.id)
        .api_err("Failed to create organization")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(org))))
}

pub async fn get_organization(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let org = state
        .store
        .get_organization(id)
        .api_err("Failed to get organization")?
        .or_not_found("Organization not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(org)))
}

pub async fn update_organization(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOrganizationRequest>,
) -> impl IntoResponse {
    let mut org = state
        .store
        .get_organization(id)
        .api_err("Failed to get organization")?
        .or_not_found("Organization not found")?;

    organization_owner(&auth.principal, &org).into_result()?;

    if let Some(name) = req.name {
        let name = name.trim();
        validate_title(name, "Organization")?;
        org.name = name.to_string();
    }

    state
        .store
        .update_organization(&org)
        .api_err("Failed to update organization")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(org)))
}

pub async fn list_hackathons(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .get_organization(id)
        .api_err("Failed to get organization")?
        .or_not_found("Organization not found")?;

    let hackathons = state
        .store
        .list_organization_hackathons(id)
        .api_err("Failed to list hackathons")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(hackathons)))
}

pub async fn create_hackathon(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CreateHackathonRequest>,
) -> impl IntoResponse {
    let org = state
        .store
        .get_organization(id)
        .api_err("Failed to get organization")?
        .or_not_found("Organization not found")?;

    organization_owner(&auth.principal, &org).into_result()?;

    let name = req.name.trim();
    validate_title(name, "Hackathon")?;
    if let (Some(starts_at), Some(ends_at)) = (req.starts_at, req.ends_at) {
        if ends_at < starts_at {
            return Err(ApiError::bad_request("Hackathon cannot end before it starts"));
        }
    }

    let new = NewHackathon {
        organization_id: org.id,
        name: name.to_string(),
        description: req.description,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
    };
    let hackathon = state
        .store
        .create_hackathon(&new, auth.principal.id)
        .api_err("Failed to create hackathon")?;

    tracing::info!(
        "Hackathon {} created in organization {} by principal {}",
        hackathon.id,
        org.id,
        auth.principal.id
    );

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(hackathon))))
}
