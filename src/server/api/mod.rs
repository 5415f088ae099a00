pub mod access;
mod chats;
mod files;
mod hackathons;
mod invites;
mod organizations;
mod teams;
mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Users
        .route("/users/me", get(users::me))
        .route("/users/{id}", get(users::get_user).patch(users::update_user))
        // Organizations
        .route("/organizations", post(organizations::create_organization))
        .route(
            "/organizations/{id}",
            get(organizations::get_organization).patch(organizations::update_organization),
        )
        .route(
            "/organizations/{id}/hackathons",
            get(organizations::list_hackathons).post(organizations::create_hackathon),
        )
        // Hackathons
        .route("/hackathons/{id}", get(hackathons::get_hackathon))
        .route("/hackathons/{id}/register", post(hackathons::register))
        .route("/hackathons/{id}/members", get(hackathons::list_members))
        .route("/hackathons/{id}/chats", get(hackathons::list_chats))
        .route(
            "/hackathons/{id}/teams",
            get(hackathons::list_teams).post(hackathons::create_team),
        )
        .route(
            "/hackathons/{id}/mentor-invites",
            post(hackathons::create_mentor_invite),
        )
        // Teams
        .route("/teams/{id}", get(teams::get_team))
        .route("/teams/{id}/invites", post(teams::create_invite))
        .route(
            "/teams/{id}/scores",
            get(teams::list_scores).post(teams::create_score),
        )
        // Invitations addressed to the caller
        .route("/invites", get(invites::list_pending))
        .route(
            "/mentor-invites/{id}/accept",
            post(invites::accept_mentor_invite),
        )
        .route(
            "/mentor-invites/{id}/reject",
            post(invites::reject_mentor_invite),
        )
        .route("/team-invites/{id}/accept", post(invites::accept_team_invite))
        .route("/team-invites/{id}/reject", post(invites::reject_team_invite))
        // Chats
        .route("/chats/{id}/messages", get(chats::list_messages))
        .route("/chats/{id}/ws", get(chats::connect))
        // File metadata
        .route("/files", post(files::create_file))
        .route("/files/{id}", get(files::get_file))
}
