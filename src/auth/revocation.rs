use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;

/// A key-value store whose entries expire on their own.
pub trait RevocationStore: Send + Sync {
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    fn exists(&self, key: &str) -> Result<bool>;
}

fn revocation_key(token_id: &str) -> String {
    format!("revoked:{token_id}")
}

/// Revokes `token_id` until `original_expiry`. Tokens that have already
/// expired are ignored, since validation rejects them anyway.
pub fn revoke(
    store: &dyn RevocationStore,
    token_id: &str,
    original_expiry: DateTime<Utc>,
) -> Result<()> {
    let Ok(ttl) = (original_expiry - Utc::now()).to_std() else {
        return Ok(());
    };
    if ttl == Duration::ZERO {
        return Ok(());
    }

    store.set(&revocation_key(token_id), "1", ttl)?;
    tracing::debug!("Revoked token {token_id} for {}s", ttl.as_secs());
    Ok(())
}

pub fn is_revoked(store: &dyn RevocationStore, token_id: &str) -> Result<bool> {
    store.exists(&revocation_key(token_id))
}
