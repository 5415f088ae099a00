use crate::error::Error;
use crate::server::AppState;
use crate::types::Principal;

use super::Claims;

#[derive(Debug)]
pub enum TokenValidationError {
    InvalidScheme,
    InvalidToken,
    UnknownPrincipal,
    InternalError,
}

/// A validated access token together with the principal it names.
#[derive(Debug, Clone)]
pub struct AuthPrincipal {
    pub claims: Claims,
    pub principal: Principal,
}

/// Extracts token from a Bearer Authorization header.
/// Returns None if no auth header is present.
/// Returns Err if the auth scheme is unsupported.
pub fn extract_token_from_header(
    auth_header: Option<&str>,
) -> Result<Option<String>, TokenValidationError> {
    match auth_header {
        Some(header) => header
            .strip_prefix("Bearer ")
            .map(|token| Some(token.trim().to_string()))
            .ok_or(TokenValidationError::InvalidScheme),
        None => Ok(None),
    }
}

/// Picks the raw token from the request. The Authorization header wins if
/// present; the `token` query parameter is only consulted without one, for
/// transports such as websocket upgrades that cannot set headers.
pub fn select_token(
    auth_header: Option<&str>,
    query_token: Option<&str>,
) -> Result<Option<String>, TokenValidationError> {
    if let Some(token) = extract_token_from_header(auth_header)? {
        return Ok(Some(token));
    }
    Ok(query_token
        .filter(|t| !t.is_empty())
        .map(str::to_string))
}

/// Validates an access token and loads the principal it was issued to.
pub fn validate_access_token(
    state: &AppState,
    raw_token: &str,
) -> Result<AuthPrincipal, TokenValidationError> {
    let claims = state.tokens.validate_access(raw_token).map_err(|e| match e {
        Error::InvalidToken => TokenValidationError::InvalidToken,
        _ => TokenValidationError::InternalError,
    })?;

    let principal = state
        .store
        .get_principal(claims.sub)
        .map_err(|e| {
            tracing::error!("Failed to load principal {}: {e}", claims.sub);
            TokenValidationError::InternalError
        })?
        .ok_or(TokenValidationError::UnknownPrincipal)?;

    Ok(AuthPrincipal { claims, principal })
}
