use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::TokenPair;
use crate::types::{FileOwner, MentorInvite, Principal, Team, TeamInvite, TeamMembership};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub principal: Principal,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePrincipalRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrganizationRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateHackathonRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    #[serde(flatten)]
    pub team: Team,
    pub members: Vec<TeamMembership>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    pub invitee_id: i64,
}

#[derive(Debug, Serialize)]
pub struct PendingInvitesResponse {
    pub mentor_invites: Vec<MentorInvite>,
    pub team_invites: Vec<TeamInvite>,
}

#[derive(Debug, Deserialize)]
pub struct CreateScoreRequest {
    pub value: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub owner: FileOwner,
    pub name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageListParams {
    /// Only messages with an id greater than this are returned.
    #[serde(default)]
    pub after: Option<i64>,
    #[serde(default)]
    pub limit: Option<i32>,
}
