//! Websocket lifecycle for one chat connection.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedSender;

use super::registry::ChatEvent;
use crate::server::AppState;
use crate::types::{Chat, Principal};

pub const MAX_MESSAGE_LEN: usize = 4000;

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    content: String,
}

/// Serves an upgraded connection whose read access was already checked.
/// `can_write` is fixed for the lifetime of the connection.
pub async fn run(
    socket: WebSocket,
    state: Arc<AppState>,
    principal: Principal,
    chat: Chat,
    can_write: bool,
) {
    let subscription = state.chats.register(chat.id);
    let connection_id = subscription.id;
    let reply = subscription.reply;
    let mut events = subscription.events;

    tracing::info!(
        "Principal {} connected to chat {} (connection {connection_id})",
        principal.id,
        chat.id
    );

    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to encode chat event: {e}");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                handle_text(&state, &principal, &chat, can_write, &reply, text.as_str());
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("Chat connection {connection_id} read failed: {e}");
                break;
            }
        }
    }

    state.chats.deregister(chat.id, connection_id);
    writer.abort();

    tracing::info!(
        "Principal {} disconnected from chat {} (connection {connection_id})",
        principal.id,
        chat.id
    );
}

fn handle_text(
    state: &AppState,
    principal: &Principal,
    chat: &Chat,
    can_write: bool,
    reply: &UnboundedSender<ChatEvent>,
    text: &str,
) {
    let incoming: IncomingMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            let _ = reply.send(ChatEvent::error(format!("Invalid message format: {e}")));
            return;
        }
    };

    let content = incoming.content.trim();
    if content.is_empty() {
        let _ = reply.send(ChatEvent::error("Message content cannot be empty"));
        return;
    }
    if content.chars().count() > MAX_MESSAGE_LEN {
        let _ = reply.send(ChatEvent::error(format!(
            "Message content exceeds {MAX_MESSAGE_LEN} characters"
        )));
        return;
    }
    if !can_write {
        let _ = reply.send(ChatEvent::error("You cannot write to this chat"));
        return;
    }

    let published = state.chats.publish(chat.id, || {
        state
            .store
            .create_chat_message(chat.id, principal.id, content)
    });

    if let Err(e) = published {
        tracing::error!("Failed to store message in chat {}: {e}", chat.id);
        let _ = reply.send(ChatEvent::error("Failed to send message"));
    }
}
