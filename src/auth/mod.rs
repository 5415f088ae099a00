mod helpers;
mod middleware;
mod password;
mod revocation;
mod token;

pub use middleware::{AuthError, RequireAuth};
pub use password::{CredentialHasher, MIN_PASSWORD_LEN};
pub use revocation::{RevocationStore, is_revoked, revoke};
pub use token::{
    Claims, DEFAULT_ACCESS_TTL_MINUTES, DEFAULT_REFRESH_TTL_DAYS, TokenIssuer, TokenKind,
    TokenPair, generate_secret,
};
