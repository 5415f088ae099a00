mod api;
pub mod dto;
pub mod response;
mod router;
mod session;
pub mod validation;

pub use api::api_router;
pub use router::{AppState, create_router};
pub use session::session_router;
