//! Persisted session storage
//!
//! Stand-in for the browser-local key-value store: a TOML file holding the
//! bearer token and its login time. Tokens older than the freshness window
//! are ignored on load.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Persisted tokens older than this are treated as absent
const MAX_AGE_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    login_time: DateTime<Utc>,
}

/// File-backed token persistence
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("frota").join("session.toml"))
    }

    /// Recover a persisted token no older than the freshness window
    pub fn load(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let session: PersistedSession = match toml::from_str(&content) {
            Ok(session) => session,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable session file");
                return None;
            }
        };
        let age = Utc::now() - session.login_time;
        if age > chrono::Duration::days(MAX_AGE_DAYS) {
            debug!(path = %self.path.display(), "persisted session is stale");
            return None;
        }
        Some(session.token)
    }

    /// Best-effort persist; failures only log
    pub fn save(&self, token: &str) {
        let session = PersistedSession {
            token: token.to_string(),
            login_time: Utc::now(),
        };
        let content = match toml::to_string(&session) {
            Ok(content) => content,
            Err(err) => {
                warn!(error = %err, "failed to serialize session");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = std::fs::write(&self.path, content) {
            warn!(path = %self.path.display(), error = %err, "failed to persist session");
        }
    }

    /// Remove the persisted session, if any
    pub fn purge(&self) {
        if self.path.exists() {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
