//! # Hackhub
//!
//! A REST and websocket backend for running hackathons, usable both as a
//! standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! hackhub = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hackhub::auth::TokenIssuer;
//! use hackhub::server::{AppState, create_router};
//! use hackhub::store::{SqliteStore, Store};
//!
//! let store = Arc::new(SqliteStore::new("./data/hackhub.db").unwrap());
//! store.initialize().unwrap();
//!
//! let tokens = TokenIssuer::new(
//!     access_secret.as_bytes(),
//!     refresh_secret.as_bytes(),
//!     chrono::Duration::minutes(15),
//!     chrono::Duration::days(14),
//! ).unwrap();
//! let state = Arc::new(AppState::new(store.clone(), store, tokens));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `hackhub` binary. Disable with `default-features = false`.

pub mod access;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod invite;
pub mod server;
pub mod store;
pub mod types;
