#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode},
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use hackhub::auth::TokenIssuer;
use hackhub::server::{AppState, create_router};
use hackhub::store::{SqliteStore, Store};
use hackhub::types::{Principal, SystemRole};

pub struct TestApp {
    pub temp_dir: TempDir,
    pub state: Arc<AppState>,
    pub store: Arc<SqliteStore>,
    pub router: Router,
}

/// A principal created straight in the store, with a fresh token pair.
pub struct TestUser {
    pub principal: Principal,
    pub access: String,
    pub refresh: String,
}

impl TestUser {
    pub fn id(&self) -> i64 {
        self.principal.id
    }
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = Arc::new(SqliteStore::new(temp_dir.path().join("hackhub.db")).expect("open db"));
        store.initialize().expect("init db");

        let tokens = TokenIssuer::new(
            b"test-access-secret-0123456789",
            b"test-refresh-secret-0123456789",
            Duration::minutes(15),
            Duration::days(14),
        )
        .expect("token issuer");

        let state = Arc::new(AppState::new(store.clone(), store.clone(), tokens));
        let router = create_router(state.clone());

        Self {
            temp_dir,
            state,
            store,
            router,
        }
    }

    pub fn user_with_role(&self, username: &str, system_role: SystemRole) -> TestUser {
        let principal = self
            .store
            .create_principal(
                username,
                &format!("{username}@example.com"),
                "unused",
                system_role,
            )
            .expect("create principal");
        let pair = self.state.tokens.issue(&principal).expect("issue tokens");
        TestUser {
            principal,
            access: pair.access_token,
            refresh: pair.refresh_token,
        }
    }

    pub fn user(&self, username: &str) -> TestUser {
        self.user_with_role(username, SystemRole::Normal)
    }

    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.raw(method, uri, token, body).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    /// Creates an organization and a hackathon owned by `owner`; returns the
    /// hackathon id.
    pub async fn hackathon(&self, owner: &TestUser) -> i64 {
        let (status, org) = self
            .post(
                "/api/v1/organizations",
                &owner.access,
                serde_json::json!({"name": "Acme"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let org_id = org["data"]["id"].as_i64().unwrap();

        let (status, hackathon) = self
            .post(
                &format!("/api/v1/organizations/{org_id}/hackathons"),
                &owner.access,
                serde_json::json!({"name": "Spring Jam"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        hackathon["data"]["id"].as_i64().unwrap()
    }

    pub async fn register(&self, user: &TestUser, hackathon_id: i64) {
        let (status, _) = self
            .request(
                Method::POST,
                &format!("/api/v1/hackathons/{hackathon_id}/register"),
                Some(&user.access),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    pub async fn team(&self, captain: &TestUser, hackathon_id: i64, name: &str) -> i64 {
        let (status, team) = self
            .post(
                &format!("/api/v1/hackathons/{hackathon_id}/teams"),
                &captain.access,
                serde_json::json!({"name": name}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        team["data"]["id"].as_i64().unwrap()
    }

    /// Chat ids of the hackathon keyed by kind, as seen by `viewer`.
    pub async fn chat_id(&self, viewer: &TestUser, hackathon_id: i64, kind: &str) -> i64 {
        let (status, chats) = self
            .get(
                &format!("/api/v1/hackathons/{hackathon_id}/chats"),
                &viewer.access,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        chats["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["kind"] == kind)
            .and_then(|c| c["id"].as_i64())
            .unwrap_or_else(|| panic!("no {kind} chat visible"))
    }
}
