//! Session and bearer-token lifecycle
//!
//! One login at a time: the whole session state sits behind a single async
//! mutex that stays held across the authentication request, so concurrent
//! callers serialize on the lock and observe the token the winner stored
//! instead of issuing duplicate logins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Credentials;
use crate::error::{ApiError, Result};
use crate::offline::OfflineState;
use crate::store::TokenStore;

/// Sentinel token served while offline mode is active
pub const MOCK_TOKEN: &str = "offline-mock-token";

/// Validity window for a freshly minted token
const TOKEN_VALIDITY: Duration = Duration::from_secs(50 * 60);

/// Assumed remaining validity for a token recovered from disk
const RECOVERED_VALIDITY: Duration = Duration::from_secs(10 * 60);

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    expires_at: Option<Instant>,
}

impl SessionState {
    fn current(&self) -> Option<String> {
        match (&self.token, self.expires_at) {
            (Some(token), Some(expires_at)) if Instant::now() < expires_at => Some(token.clone()),
            _ => None,
        }
    }

    fn set(&mut self, token: String, validity: Duration) {
        self.token = Some(token);
        self.expires_at = Some(Instant::now() + validity);
    }

    fn clear(&mut self) {
        self.token = None;
        self.expires_at = None;
    }
}

/// Manages the bearer-token lifecycle against the auth endpoint
pub struct SessionManager {
    http: Client,
    base_url: Url,
    login_url: Url,
    credentials: Credentials,
    login_budget: Duration,
    probe_budget: Duration,
    state: Mutex<SessionState>,
    offline: Arc<OfflineState>,
    store: Option<TokenStore>,
}

impl SessionManager {
    pub(crate) fn new(
        http: Client,
        base_url: Url,
        credentials: Credentials,
        login_budget: Duration,
        probe_budget: Duration,
        offline: Arc<OfflineState>,
        store: Option<TokenStore>,
    ) -> Result<Self> {
        let login_url = base_url.join("auth/login")?;
        Ok(Self {
            http,
            base_url,
            login_url,
            credentials,
            login_budget,
            probe_budget,
            state: Mutex::new(SessionState::default()),
            offline,
            store,
        })
    }

    /// A valid bearer token, minting one if needed.
    ///
    /// Offline mode short-circuits to the sentinel token. Otherwise the
    /// in-memory token is used while fresh, then the persisted session, then
    /// an availability-gated login.
    pub async fn valid_token(&self) -> Result<String> {
        if self.offline.mock_active() {
            return Ok(MOCK_TOKEN.to_string());
        }

        let mut state = self.state.lock().await;
        if let Some(token) = state.current() {
            return Ok(token);
        }

        if state.token.is_none() {
            if let Some(store) = &self.store {
                if let Some(token) = store.load() {
                    debug!("recovered persisted session token");
                    state.set(token.clone(), RECOVERED_VALIDITY);
                    return Ok(token);
                }
            }
        }

        if !self
            .offline
            .check_api(&self.http, &self.base_url, self.probe_budget)
            .await
        {
            return Ok(MOCK_TOKEN.to_string());
        }

        self.login_locked(&mut state).await
    }

    /// Authenticate against the backend.
    ///
    /// Idempotent under concurrency: a caller that arrives while another
    /// login is in flight blocks on the session lock and receives the
    /// freshly minted token instead of issuing a second request.
    pub async fn login(&self) -> Result<String> {
        if self.offline.mock_active() {
            return Ok(MOCK_TOKEN.to_string());
        }
        let mut state = self.state.lock().await;
        if let Some(token) = state.current() {
            return Ok(token);
        }
        self.login_locked(&mut state).await
    }

    async fn login_locked(&self, state: &mut SessionState) -> Result<String> {
        debug!(url = %self.login_url, "authenticating service session");
        let send = self
            .http
            .post(self.login_url.clone())
            .json(&serde_json::json!({
                "username": self.credentials.username,
                "password": self.credentials.password,
            }))
            .send();

        let response = match tokio::time::timeout(self.login_budget, send).await {
            Err(_) => return Err(ApiError::Timeout),
            Ok(Err(err)) => {
                let err = ApiError::from_transport(err);
                if err.is_connectivity() {
                    warn!(error = %err, "auth endpoint unreachable, entering offline mode");
                    self.offline.enable_mock();
                    return Ok(MOCK_TOKEN.to_string());
                }
                return Err(err);
            }
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(%status, "service credentials rejected");
            state.clear();
            if let Some(store) = &self.store {
                store.purge();
            }
            return Err(ApiError::AuthRejected {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message = if message.is_empty() {
                format!("HTTP {}", status)
            } else {
                message
            };
            return Err(ApiError::server_error(status.as_u16(), message));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let token = extract_token(&body)
            .ok_or_else(|| ApiError::Parse("no token in login response".to_string()))?;

        state.set(token.clone(), TOKEN_VALIDITY);
        if let Some(store) = &self.store {
            store.save(&token);
        }
        info!("service session established");
        Ok(token)
    }

    /// Drop the in-memory token so the next call re-authenticates
    pub async fn invalidate(&self) {
        self.state.lock().await.clear();
    }

    /// Clear token state and purge the persisted session
    pub async fn logout(&self) {
        self.state.lock().await.clear();
        if let Some(store) = &self.store {
            store.purge();
        }
        info!("service session closed");
    }
}

/// Pull the bearer token out of a login response body.
///
/// Accepts `{token}`, `{accessToken}`, `{bearer}`, a JSON string, or the
/// raw body itself.
fn extract_token(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["token", "accessToken", "bearer"] {
            if let Some(token) = value.get(key).and_then(|t| t.as_str()) {
                return Some(token.to_string());
            }
        }
        if let Some(token) = value.as_str() {
            return Some(token.to_string());
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_variants() {
        assert_eq!(extract_token(r#"{"token":"abc"}"#).as_deref(), Some("abc"));
        assert_eq!(
            extract_token(r#"{"accessToken":"def"}"#).as_deref(),
            Some("def")
        );
        assert_eq!(extract_token(r#"{"bearer":"ghi"}"#).as_deref(), Some("ghi"));
        assert_eq!(extract_token(r#""quoted""#).as_deref(), Some("quoted"));
        assert_eq!(extract_token("raw-token").as_deref(), Some("raw-token"));
        assert_eq!(extract_token(""), None);
    }

    #[test]
    fn test_extract_token_prefers_token_key() {
        let body = r#"{"token":"a","accessToken":"b"}"#;
        assert_eq!(extract_token(body).as_deref(), Some("a"));
    }

    #[test]
    fn test_session_state_expiry() {
        let mut state = SessionState::default();
        assert!(state.current().is_none());

        state.set("tok".to_string(), Duration::from_secs(60));
        assert_eq!(state.current().as_deref(), Some("tok"));

        state.set("tok".to_string(), Duration::from_secs(0));
        assert!(state.current().is_none());

        state.clear();
        assert!(state.token.is_none());
    }
}
