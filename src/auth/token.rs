use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::revocation::{RevocationStore, is_revoked};
use crate::error::{Error, Result};
use crate::types::Principal;

const MIN_SECRET_LEN: usize = 16;

pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Payload carried by both access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub email: String,
    pub jti: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Issues and validates HMAC-SHA256 signed session tokens.
///
/// Access and refresh tokens are signed with separate keys, so a leaked access
/// secret cannot mint refresh tokens and vice versa.
pub struct TokenIssuer {
    access_keys: (EncodingKey, DecodingKey),
    refresh_keys: (EncodingKey, DecodingKey),
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self> {
        if access_secret.len() < MIN_SECRET_LEN || refresh_secret.len() < MIN_SECRET_LEN {
            return Err(Error::Config(format!(
                "token secrets must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if access_secret == refresh_secret {
            return Err(Error::Config(
                "access and refresh secrets must differ".to_string(),
            ));
        }
        if access_ttl <= Duration::zero() || refresh_ttl <= Duration::zero() {
            return Err(Error::Config("token lifetimes must be positive".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            access_keys: (
                EncodingKey::from_secret(access_secret),
                DecodingKey::from_secret(access_secret),
            ),
            refresh_keys: (
                EncodingKey::from_secret(refresh_secret),
                DecodingKey::from_secret(refresh_secret),
            ),
            validation,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Issues a fresh access/refresh pair, each with its own token id.
    pub fn issue(&self, principal: &Principal) -> Result<TokenPair> {
        let now = Utc::now();
        let access_expires_at = now + self.access_ttl;
        let refresh_expires_at = now + self.refresh_ttl;

        let access = self.claims_for(principal, TokenKind::Access, now, access_expires_at);
        let refresh = self.claims_for(principal, TokenKind::Refresh, now, refresh_expires_at);

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
            access_expires_at,
            refresh_expires_at,
        })
    }

    pub fn validate_access(&self, token: &str) -> Result<Claims> {
        self.decode(token, TokenKind::Access)
    }

    /// Like [`validate_access`](Self::validate_access), and also fails with
    /// `TokenRevoked` when the token id has been revoked.
    pub fn validate_refresh(
        &self,
        token: &str,
        revocations: &dyn RevocationStore,
    ) -> Result<Claims> {
        let claims = self.decode(token, TokenKind::Refresh)?;
        if is_revoked(revocations, &claims.jti)? {
            return Err(Error::TokenRevoked);
        }
        Ok(claims)
    }

    fn claims_for(
        &self,
        principal: &Principal,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Claims {
        Claims {
            sub: principal.id,
            username: principal.username.clone(),
            email: principal.email.clone(),
            jti: Uuid::new_v4().to_string(),
            kind,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    fn keys(&self, kind: TokenKind) -> &(EncodingKey, DecodingKey) {
        match kind {
            TokenKind::Access => &self.access_keys,
            TokenKind::Refresh => &self.refresh_keys,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        let (encoding, _) = self.keys(claims.kind);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, encoding)
            .map_err(|e| Error::Config(format!("failed to sign token: {e}")))
    }

    fn decode(&self, token: &str, kind: TokenKind) -> Result<Claims> {
        let (_, decoding) = self.keys(kind);
        let data = jsonwebtoken::decode::<Claims>(token, decoding, &self.validation).map_err(|e| {
            tracing::debug!("Rejected {:?} token: {e}", kind);
            Error::InvalidToken
        })?;

        if data.claims.kind != kind || data.claims.jti.is_empty() {
            return Err(Error::InvalidToken);
        }
        Ok(data.claims)
    }
}

/// Generates a random secret suitable for [`TokenIssuer::new`], hex encoded.
#[must_use]
pub fn generate_secret() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
