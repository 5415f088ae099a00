use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::Result;
use crate::types::ChatMessage;

pub type ConnectionId = u64;

/// A frame sent from the server to a chat connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatEvent {
    Message(ChatMessage),
    Error { message: String },
}

impl ChatEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// One registered connection. `events` yields broadcasts and in-band replies;
/// `reply` feeds the same queue without reaching any other connection.
pub struct Subscription {
    pub id: ConnectionId,
    pub chat_id: i64,
    pub events: UnboundedReceiver<ChatEvent>,
    pub reply: UnboundedSender<ChatEvent>,
}

type Connections = HashMap<i64, HashMap<ConnectionId, UnboundedSender<ChatEvent>>>;

/// Live chat connections, keyed by chat id.
///
/// A single mutex guards the whole map. `publish` persists and fans out
/// while holding it, so every connection observes messages of a chat in
/// the order they were stored.
#[derive(Default)]
pub struct ChatRegistry {
    next_id: AtomicU64,
    chats: Mutex<Connections>,
}

impl ChatRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connections> {
        self.chats.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn register(&self, chat_id: i64) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        self.lock()
            .entry(chat_id)
            .or_default()
            .insert(id, tx.clone());

        Subscription {
            id,
            chat_id,
            events: rx,
            reply: tx,
        }
    }

    pub fn deregister(&self, chat_id: i64, id: ConnectionId) {
        let mut chats = self.lock();
        if let Some(connections) = chats.get_mut(&chat_id) {
            connections.remove(&id);
            if connections.is_empty() {
                chats.remove(&chat_id);
            }
        }
    }

    #[must_use]
    pub fn connection_count(&self, chat_id: i64) -> usize {
        self.lock().get(&chat_id).map_or(0, HashMap::len)
    }

    /// Runs `persist` and delivers the stored message to every connection of
    /// `chat_id`. Nothing is delivered if `persist` fails. Connections whose
    /// receiver is gone are dropped along the way.
    pub fn publish<F>(&self, chat_id: i64, persist: F) -> Result<ChatMessage>
    where
        F: FnOnce() -> Result<ChatMessage>,
    {
        let mut chats = self.lock();
        let message = persist()?;

        if let Some(connections) = chats.get_mut(&chat_id) {
            connections.retain(|_, tx| tx.send(ChatEvent::Message(message.clone())).is_ok());
            if connections.is_empty() {
                chats.remove(&chat_id);
            }
        }

        Ok(message)
    }
}
