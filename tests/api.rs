mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;
use hackhub::store::Store;
use hackhub::types::SystemRole;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.raw(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_login_and_me() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({"username": "ada", "email": "Ada@Example.com", "password": "correct horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["principal"]["email"], "ada@example.com");
    assert!(body["data"]["principal"].get("password_hash").is_none());
    assert!(body["data"]["access_token"].is_string());
    assert!(body["data"]["refresh_token"].is_string());

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({"username": "ada", "email": "other@example.com", "password": "correct horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let response = app
        .raw(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"login": "ada", "password": "wrong password"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"login": "ada@example.com", "password": "correct horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/v1/users/me", &access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["username"], "ada");
}

#[tokio::test]
async fn test_signup_validation() {
    let app = TestApp::new();

    for body in [
        json!({"username": "a", "email": "a@example.com", "password": "long enough"}),
        json!({"username": "ada", "email": "not-an-email", "password": "long enough"}),
        json!({"username": "ada", "email": "ada@example.com", "password": "short"}),
    ] {
        let (status, _) = app
            .request(Method::POST, "/api/v1/auth/signup", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_authentication_required() {
    let app = TestApp::new();
    let ada = app.user("ada");

    let response = app.raw(Method::GET, "/api/v1/users/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));

    let (status, _) = app.get("/api/v1/users/me", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Refresh tokens are signed with a different key.
    let (status, _) = app.get("/api/v1/users/me", &ada.refresh).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Query token is accepted when no header is present.
    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/v1/users/me?token={}", ada.access),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The header wins over a query token.
    let (status, _) = app
        .get(&format!("/api/v1/users/me?token={}", ada.access), "garbage")
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_and_logout() {
    let app = TestApp::new();
    let ada = app.user("ada");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({"refresh_token": ada.refresh})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let new_refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, ada.refresh);

    // Refreshing does not revoke the presented token.
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({"refresh_token": ada.refresh})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/logout",
            None,
            Some(json!({"refresh_token": ada.refresh})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..2 {
        let (status, body) = app
            .request(
                Method::POST,
                "/api/v1/auth/refresh",
                None,
                Some(json!({"refresh_token": ada.refresh})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Token revoked");
    }

    // Only the logged-out token is affected.
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({"refresh_token": new_refresh})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_self_or_unrestricted_on_user_update() {
    let app = TestApp::new();
    let restricted = app.user_with_role("restricted", SystemRole::Restricted);
    let normal = app.user("normal");

    let (status, _) = app
        .patch(
            &format!("/api/v1/users/{}", normal.id()),
            &restricted.access,
            json!({"username": "hijacked"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .patch(
            &format!("/api/v1/users/{}", restricted.id()),
            &restricted.access,
            json!({"username": "renamed"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "renamed");

    let (status, _) = app
        .patch(
            &format!("/api/v1/users/{}", restricted.id()),
            &normal.access,
            json!({"username": "normal"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_organization_owner_guard() {
    let app = TestApp::new();
    let owner = app.user("owner");
    let restricted = app.user_with_role("restricted", SystemRole::Restricted);
    let normal = app.user("normal");

    let (_, org) = app
        .post("/api/v1/organizations", &owner.access, json!({"name": "Acme"}))
        .await;
    let org_id = org["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/organizations/{org_id}");

    let (status, _) = app
        .patch(&uri, &restricted.access, json!({"name": "Taken"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            &format!("{uri}/hackathons"),
            &restricted.access,
            json!({"name": "Rogue Jam"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unrestricted principals pass without owning the organization.
    let (status, _) = app
        .patch(&uri, &normal.access, json!({"name": "Acme Labs"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, own) = app
        .post(
            "/api/v1/organizations",
            &restricted.access,
            json!({"name": "Mine"}),
        )
        .await;
    let own_id = own["data"]["id"].as_i64().unwrap();
    let (status, _) = app
        .patch(
            &format!("/api/v1/organizations/{own_id}"),
            &restricted.access,
            json!({"name": "Still mine"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_hackathon_creation_and_membership() {
    let app = TestApp::new();
    let owner = app.user("owner");
    let member = app.user("member");
    let hackathon = app.hackathon(&owner).await;

    let (status, chats) = app
        .get(&format!("/api/v1/hackathons/{hackathon}/chats"), &owner.access)
        .await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<_> = chats["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&"general".to_string()));
    assert!(kinds.contains(&"organizer".to_string()));

    // Non-members are forbidden from member-only listings.
    let (status, _) = app
        .get(&format!("/api/v1/hackathons/{hackathon}/members"), &member.access)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.register(&member, hackathon).await;
    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/hackathons/{hackathon}/register"),
            Some(&member.access),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, members) = app
        .get(&format!("/api/v1/hackathons/{hackathon}/members"), &member.access)
        .await;
    assert_eq!(status, StatusCode::OK);
    let roles: Vec<_> = members["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_i64().unwrap())
        .collect();
    assert_eq!(roles, vec![3, 1]);

    let (status, _) = app
        .get("/api/v1/hackathons/9999", &member.access)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mentor_invite_flow() {
    let app = TestApp::new();
    let organizer = app.user("organizer");
    let member = app.user("member");
    let outsider = app.user("outsider");
    let hackathon = app.hackathon(&organizer).await;
    app.register(&member, hackathon).await;

    let invites_uri = format!("/api/v1/hackathons/{hackathon}/mentor-invites");

    // Outsiders have no role at all: reported as not found.
    let (status, _) = app
        .post(&invites_uri, &outsider.access, json!({"invitee_id": member.id()}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post(&invites_uri, &member.access, json!({"invitee_id": outsider.id()}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient role");

    let (status, _) = app
        .post(&invites_uri, &organizer.access, json!({"invitee_id": organizer.id()}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, invite) = app
        .post(&invites_uri, &organizer.access, json!({"invitee_id": member.id()}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invite["data"]["status"], "pending");
    let invite_id = invite["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .post(&invites_uri, &organizer.access, json!({"invitee_id": member.id()}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, pending) = app.get("/api/v1/invites", &member.access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["data"]["mentor_invites"].as_array().unwrap().len(), 1);

    let accept_uri = format!("/api/v1/mentor-invites/{invite_id}/accept");
    let (status, _) = app.post(&accept_uri, &outsider.access, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, accepted) = app.post(&accept_uri, &member.access, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["data"]["status"], "accepted");

    let (status, _) = app.post(&accept_uri, &member.access, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = app
        .post(
            &format!("/api/v1/mentor-invites/{invite_id}/reject"),
            &member.access,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Registering again never demotes the new mentor.
    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/hackathons/{hackathon}/register"),
            Some(&member.access),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let membership = app
        .store
        .get_hackathon_membership(member.id(), hackathon)
        .unwrap()
        .unwrap();
    assert_eq!(membership.role.level(), 2);

    let (_, pending) = app.get("/api/v1/invites", &member.access).await;
    assert!(pending["data"]["mentor_invites"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_team_invite_flow_and_scores() {
    let app = TestApp::new();
    let organizer = app.user("organizer");
    let captain = app.user("captain");
    let recruit = app.user("recruit");
    let bystander = app.user("bystander");
    let hackathon = app.hackathon(&organizer).await;
    for user in [&captain, &recruit, &bystander] {
        app.register(user, hackathon).await;
    }

    let team = app.team(&captain, hackathon, "Crabs").await;
    let (status, _) = app
        .post(
            &format!("/api/v1/hackathons/{hackathon}/teams"),
            &captain.access,
            json!({"name": "Second"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let invites_uri = format!("/api/v1/teams/{team}/invites");

    // Not on the team at all.
    let (status, _) = app
        .post(&invites_uri, &bystander.access, json!({"invitee_id": recruit.id()}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, invite) = app
        .post(&invites_uri, &captain.access, json!({"invitee_id": recruit.id()}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let invite_id = invite["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .post(&invites_uri, &captain.access, json!({"invitee_id": recruit.id()}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(
            &format!("/api/v1/team-invites/{invite_id}/accept"),
            &recruit.access,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, team_body) = app.get(&format!("/api/v1/teams/{team}"), &recruit.access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team_body["data"]["members"].as_array().unwrap().len(), 2);

    // Members below captain cannot invite.
    let (status, body) = app
        .post(&invites_uri, &recruit.access, json!({"invitee_id": bystander.id()}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient role");

    // Scores: only mentors and above create them.
    let scores_uri = format!("/api/v1/teams/{team}/scores");
    let (status, _) = app
        .post(&scores_uri, &captain.access, json!({"value": 100}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(&scores_uri, &organizer.access, json!({"value": 101}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, score) = app
        .post(
            &scores_uri,
            &organizer.access,
            json!({"value": 87, "comment": "Great demo"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(score["data"]["value"], 87);

    let (status, scores) = app.get(&scores_uri, &recruit.access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scores["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.get(&scores_uri, &bystander.access).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_chat_message_access_and_paging() {
    let app = TestApp::new();
    let organizer = app.user("organizer");
    let captain = app.user("captain");
    let other = app.user("other");
    let outsider = app.user("outsider");
    let hackathon = app.hackathon(&organizer).await;
    app.register(&captain, hackathon).await;
    app.register(&other, hackathon).await;
    let _team = app.team(&captain, hackathon, "Crabs").await;

    let general = app.chat_id(&organizer, hackathon, "general").await;
    let team_chat = app.chat_id(&captain, hackathon, "team").await;

    // The team chat is hidden from participants outside the team.
    let (_, visible) = app
        .get(&format!("/api/v1/hackathons/{hackathon}/chats"), &other.access)
        .await;
    assert_eq!(visible["data"].as_array().unwrap().len(), 2);

    for i in 0..3 {
        app.store
            .create_chat_message(general, organizer.id(), &format!("message {i}"))
            .unwrap();
    }

    let (status, page) = app
        .get(
            &format!("/api/v1/chats/{general}/messages?limit=2"),
            &other.access,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["has_more"], true);
    let cursor = page["next_cursor"].as_str().unwrap().to_string();

    let (_, rest) = app
        .get(
            &format!("/api/v1/chats/{general}/messages?after={cursor}"),
            &other.access,
        )
        .await;
    assert_eq!(rest["data"][0]["content"], "message 2");
    assert_eq!(rest["has_more"], false);

    let (status, _) = app
        .get(&format!("/api/v1/chats/{general}/messages"), &outsider.access)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/api/v1/chats/{team_chat}/messages"), &other.access)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Organizers read every team chat.
    let (status, _) = app
        .get(&format!("/api/v1/chats/{team_chat}/messages"), &organizer.access)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_file_owner_dispatch() {
    let app = TestApp::new();
    let organizer = app.user("organizer");
    let captain = app.user("captain");
    let member = app.user("member");
    let restricted = app.user_with_role("restricted", SystemRole::Restricted);
    let outsider = app.user("outsider");
    let hackathon = app.hackathon(&organizer).await;
    app.register(&captain, hackathon).await;
    app.register(&member, hackathon).await;
    let team = app.team(&captain, hackathon, "Crabs").await;

    let file = |kind: &str, id: i64| {
        json!({
            "owner": {"kind": kind, "id": id},
            "name": "slides.pdf",
            "content_type": "application/pdf",
            "size_bytes": 1024,
            "storage_key": "uploads/slides.pdf"
        })
    };

    // User-owned: self, or anyone unrestricted.
    let (status, _) = app
        .post("/api/v1/files", &restricted.access, file("user", member.id()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .post("/api/v1/files", &restricted.access, file("user", restricted.id()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Team-owned: team members only.
    let (status, _) = app
        .post("/api/v1/files", &member.access, file("team", team))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, team_file) = app
        .post("/api/v1/files", &captain.access, file("team", team))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(team_file["data"]["owner"]["kind"], "team");
    let team_file_id = team_file["data"]["id"].as_i64().unwrap();

    // Hackathon-owned: organizers only.
    let (status, _) = app
        .post("/api/v1/files", &member.access, file("hackathon", hackathon))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, hackathon_file) = app
        .post("/api/v1/files", &organizer.access, file("hackathon", hackathon))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let hackathon_file_id = hackathon_file["data"]["id"].as_i64().unwrap();

    // Missing owners are indistinguishable from ones the caller cannot write to.
    let (status, _) = app
        .post("/api/v1/files", &organizer.access, file("team", 9999))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .post("/api/v1/files", &restricted.access, file("user", 9999))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .post("/api/v1/files", &member.access, file("hackathon", 9999))
        .await;
    let (outsider_status, _) = app
        .post("/api/v1/files", &outsider.access, file("hackathon", hackathon))
        .await;
    assert_eq!(status, outsider_status);

    // Callers allowed to write anywhere still get a 404 for a missing owner.
    let (status, _) = app
        .post("/api/v1/files", &member.access, file("user", 9999))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Reads.
    let (status, _) = app
        .get(&format!("/api/v1/files/{team_file_id}"), &member.access)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .get(&format!("/api/v1/files/{team_file_id}"), &organizer.access)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .get(&format!("/api/v1/files/{hackathon_file_id}"), &member.access)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .get(&format!("/api/v1/files/{hackathon_file_id}"), &outsider.access)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
