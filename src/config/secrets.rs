use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::auth::generate_secret;
use crate::error::{Error, Result};

/// Token signing secrets, kept in `secrets.toml` inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secrets {
    pub access_secret: String,
    pub refresh_secret: String,
}

impl Secrets {
    #[must_use]
    pub fn generate() -> Self {
        Self {
            access_secret: generate_secret(),
            refresh_secret: generate_secret(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("invalid secrets file {}: {e}", path.display())))
    }

    /// Writes the secrets, readable by the owner only on unix.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string(self)
            .map_err(|e| Error::Config(format!("failed to encode secrets: {e}")))?;
        fs::write(path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
                tracing::warn!("Failed to set permissions on {}: {e}", path.display());
            }
        }

        Ok(())
    }
}
