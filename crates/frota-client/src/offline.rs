//! Backend availability detection and offline mode
//!
//! The first data request probes the backend once; the verdict is memoized
//! until an explicit reset. A connectivity-class probe failure (or any
//! connectivity failure later on) flips the client into mock mode, where
//! every read serves the bundled fixtures without touching the network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// Backend reachability as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Not probed yet
    Unknown,
    /// Backend process answered (any HTTP status)
    Available,
    /// Request never reached a server
    Unavailable,
}

/// Shared availability + mock-mode state
pub struct OfflineState {
    availability: Mutex<Availability>,
    mock: AtomicBool,
}

impl OfflineState {
    pub fn new() -> Self {
        Self {
            availability: Mutex::new(Availability::Unknown),
            mock: AtomicBool::new(false),
        }
    }

    pub fn availability(&self) -> Availability {
        *self.availability.lock()
    }

    /// Whether reads must serve fixtures instead of the network
    pub fn mock_active(&self) -> bool {
        self.mock.load(Ordering::Relaxed)
    }

    pub fn enable_mock(&self) {
        self.mock.store(true, Ordering::Relaxed);
    }

    /// Forget the probe verdict and leave mock mode (recovery override)
    pub fn reset(&self) {
        *self.availability.lock() = Availability::Unknown;
        self.mock.store(false, Ordering::Relaxed);
    }

    /// Pin the client offline (testing/recovery override)
    pub fn force_offline(&self) {
        *self.availability.lock() = Availability::Unavailable;
        self.mock.store(true, Ordering::Relaxed);
    }

    /// Probe backend reachability, memoized after the first definite result.
    ///
    /// Any HTTP response proves the backend process is up, even an error
    /// status. Only a connectivity-class failure marks it unavailable (and
    /// enables mock mode); other failures count as reachable-but-degraded.
    pub async fn check_api(&self, http: &Client, base_url: &Url, budget: Duration) -> bool {
        match self.availability() {
            Availability::Available => return true,
            Availability::Unavailable => return false,
            Availability::Unknown => {}
        }

        debug!(url = %base_url, "probing backend availability");
        let available = match tokio::time::timeout(budget, http.get(base_url.clone()).send()).await
        {
            Ok(Ok(response)) => {
                debug!(status = %response.status(), "backend answered probe");
                true
            }
            Ok(Err(err)) if err.is_connect() => {
                warn!(error = %err, "backend unreachable, enabling offline mode");
                self.enable_mock();
                false
            }
            Ok(Err(err)) => {
                debug!(error = %err, "probe degraded, treating backend as available");
                true
            }
            Err(_) => {
                debug!("probe timed out, treating backend as available");
                true
            }
        };

        *self.availability.lock() = if available {
            Availability::Available
        } else {
            Availability::Unavailable
        };
        available
    }
}

impl Default for OfflineState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unknown_and_online() {
        let state = OfflineState::new();
        assert_eq!(state.availability(), Availability::Unknown);
        assert!(!state.mock_active());
    }

    #[test]
    fn test_force_offline() {
        let state = OfflineState::new();
        state.force_offline();
        assert_eq!(state.availability(), Availability::Unavailable);
        assert!(state.mock_active());
    }

    #[test]
    fn test_reset_clears_both() {
        let state = OfflineState::new();
        state.force_offline();
        state.reset();
        assert_eq!(state.availability(), Availability::Unknown);
        assert!(!state.mock_active());
    }

    #[tokio::test]
    async fn test_memoized_verdict_short_circuits_probe() {
        let state = OfflineState::new();
        state.force_offline();
        // Nothing listens on this URL; a real probe would error out, but the
        // memoized verdict must answer without any network attempt.
        let http = Client::new();
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        assert!(!state.check_api(&http, &url, Duration::from_millis(50)).await);
    }
}
