mod access;
mod registry;
pub mod session;

pub use access::{ChatMode, chat_access, check_chat_access};
pub use registry::{ChatEvent, ChatRegistry, ConnectionId, Subscription};
