mod handlers;

use std::sync::Arc;

use axum::{Router, routing::post};

use crate::server::AppState;

pub fn session_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/logout", post(handlers::logout))
}
