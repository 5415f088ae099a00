use thiserror::Error;

use crate::access::DenyReason;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("access denied: {0}")]
    Denied(DenyReason),

    #[error("invalid token")]
    InvalidToken,

    #[error("token revoked")]
    TokenRevoked,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invitation already resolved")]
    AlreadyResolved,
}

impl Error {
    /// True for failures of the storage layer, as opposed to decisions.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Io(_) | Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
