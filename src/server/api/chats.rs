use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, WebSocketUpgrade},
    response::IntoResponse,
};

use crate::auth::RequireAuth;
use crate::chat::{ChatMode, check_chat_access, session};
use crate::server::AppState;
use crate::server::dto::MessageListParams;
use crate::server::response::{
    ApiError, DEFAULT_PAGE_SIZE, PaginatedResponse, StoreOptionExt, StoreResultExt, paginate,
};
use crate::store::Store;
use crate::types::Chat;

fn load_chat(store: &dyn Store, id: i64) -> Result<Chat, ApiError> {
    store
        .get_chat(id)
        .api_err("Failed to get chat")?
        .or_not_found("Chat not found")
}

pub async fn list_messages(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<MessageListParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let chat = load_chat(store, id)?;

    check_chat_access(store, auth.principal.id, &chat, ChatMode::Read)
        .api_err("Failed to check chat access")?
        .into_result()?;

    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, DEFAULT_PAGE_SIZE);
    let after = params.after.unwrap_or(0);

    let messages = store
        .list_chat_messages(chat.id, after, limit + 1)
        .api_err("Failed to list messages")?;

    let (messages, next_cursor, has_more) =
        paginate(messages, limit as usize, |m| m.id.to_string());

    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        messages,
        next_cursor,
        has_more,
    )))
}

/// Upgrades to a chat websocket. Read access is checked before the upgrade;
/// write access is decided once and kept for the connection.
pub async fn connect(
    auth: RequireAuth,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let chat = load_chat(store, id)?;

    check_chat_access(store, auth.principal.id, &chat, ChatMode::Read)
        .api_err("Failed to check chat access")?
        .into_result()?;
    let can_write = check_chat_access(store, auth.principal.id, &chat, ChatMode::Write)
        .api_err("Failed to check chat access")?
        .is_allowed();

    let principal = auth.principal;
    Ok::<_, ApiError>(
        ws.on_upgrade(move |socket| session::run(socket, state, principal, chat, can_write)),
    )
}
