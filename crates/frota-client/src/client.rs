//! Fleet API client
//!
//! One owned value ties the four mechanisms together: session manager,
//! availability/offline state, response cache, and request executor. Every
//! read degrades through the same policy (connectivity failure → offline
//! fixtures, anything else → best-effort fallback, never an error); every
//! mutation propagates failures and clears the cache on success.

use std::sync::Arc;

use frota_core::models::{
    Alert, AlertDraft, Maintenance, MaintenanceDraft, Position, Truck, TruckRef, VehicleHistory,
    Waypoint,
};
use futures::future;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::executor::RequestExecutor;
use crate::fixtures;
use crate::offline::{Availability, OfflineState};
use crate::report::{self, ChatClient};
use crate::session::SessionManager;
use crate::store::TokenStore;

/// Client for the fleet-management backend
#[derive(Clone)]
pub struct FleetClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    config: ClientConfig,
    offline: Arc<OfflineState>,
    cache: Arc<ResponseCache>,
    session: Arc<SessionManager>,
    executor: RequestExecutor,
    chat: ChatClient,
}

impl FleetClient {
    /// Create a client from a configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_budget())
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let offline = Arc::new(OfflineState::new());
        let cache = Arc::new(ResponseCache::new(config.cache_ttl()));
        let store = config.session_file.clone().map(TokenStore::new);
        let session = Arc::new(SessionManager::new(
            http.clone(),
            base_url.clone(),
            config.credentials.clone(),
            config.login_budget(),
            config.probe_budget(),
            offline.clone(),
            store,
        )?);
        let executor = RequestExecutor::new(
            http.clone(),
            session.clone(),
            cache.clone(),
            config.retry_policy(),
            config.request_budget(),
        );
        let chat = ChatClient::new(http.clone(), config.chat.clone(), config.chat_budget());

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                config,
                offline,
                cache,
                session,
                executor,
                chat,
            }),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Session & availability
    // =========================================================================

    /// A valid bearer token, logging in if needed
    pub async fn valid_token(&self) -> Result<String> {
        self.inner.session.valid_token().await
    }

    /// Authenticate explicitly (idempotent under concurrency)
    pub async fn login(&self) -> Result<String> {
        self.inner.session.login().await
    }

    /// Close the session: token state, persisted session, and cache
    pub async fn logout(&self) {
        self.inner.session.logout().await;
        self.inner.cache.clear();
    }

    /// Probe backend reachability (memoized after the first definite result)
    pub async fn check_api(&self) -> bool {
        self.inner
            .offline
            .check_api(
                &self.inner.http,
                &self.inner.base_url,
                self.inner.config.probe_budget(),
            )
            .await
    }

    /// Last observed backend availability
    pub fn availability(&self) -> Availability {
        self.inner.offline.availability()
    }

    /// Whether reads currently serve fixtures instead of the network
    pub fn offline(&self) -> bool {
        self.inner.offline.mock_active()
    }

    /// Forget the availability verdict and leave offline mode
    pub fn reset_api_state(&self) {
        self.inner.offline.reset();
    }

    /// Pin the client offline (recovery/testing override)
    pub fn force_offline(&self) {
        self.inner.offline.force_offline();
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Maintenance records for one truck
    #[instrument(skip(self))]
    pub async fn maintenance_for_truck(&self, truck_id: i64) -> Vec<Maintenance> {
        if self.inner.offline.mock_active() {
            return fixtures::maintenance_for_truck(truck_id);
        }
        match self
            .fetch(&format!("manutencao/caminhao/{}", truck_id))
            .await
        {
            Ok(records) => records,
            Err(err) => self.degrade(err, || fixtures::maintenance_for_truck(truck_id), Vec::new),
        }
    }

    /// All maintenance records across the fleet.
    ///
    /// The backend has no collection endpoint; the list is synthesized by
    /// fanning out over the configured known truck ids and flattening
    /// whatever fulfills. Per-truck failures are dropped.
    #[instrument(skip(self))]
    pub async fn list_maintenance(&self) -> Vec<Maintenance> {
        if self.inner.offline.mock_active() {
            return fixtures::maintenance();
        }
        let fetches = self.inner.config.scan_truck_ids.iter().map(|id| {
            let path = format!("manutencao/caminhao/{}", id);
            async move { self.fetch::<Vec<Maintenance>>(&path).await }
        });
        let results = future::join_all(fetches).await;
        self.collect_fanout(results, fixtures::maintenance)
    }

    /// Create a maintenance record. Errors propagate to the caller.
    #[instrument(skip(self, draft))]
    pub async fn create_maintenance(&self, draft: &MaintenanceDraft) -> Result<Maintenance> {
        if self.inner.offline.mock_active() {
            return Ok(simulated_maintenance(fixtures::simulated_id(), draft));
        }
        let url = self.url("manutencao")?;
        let body = to_body(draft)?;
        let value = self
            .inner
            .executor
            .send_json(Method::POST, url, Some(body))
            .await?;
        self.inner.cache.clear();
        from_value(value)
    }

    /// Update a maintenance record. Errors propagate to the caller.
    #[instrument(skip(self, draft))]
    pub async fn update_maintenance(
        &self,
        id: i64,
        draft: &MaintenanceDraft,
    ) -> Result<Maintenance> {
        if self.inner.offline.mock_active() {
            return Ok(simulated_maintenance(id, draft));
        }
        let url = self.url(&format!("manutencao/{}", id))?;
        let body = to_body(draft)?;
        let value = self
            .inner
            .executor
            .send_json(Method::PUT, url, Some(body))
            .await?;
        self.inner.cache.clear();
        from_value(value)
    }

    /// Delete a maintenance record. Errors propagate to the caller.
    #[instrument(skip(self))]
    pub async fn delete_maintenance(&self, id: i64) -> Result<()> {
        if self.inner.offline.mock_active() {
            return Ok(());
        }
        let url = self.url(&format!("manutencao/{}", id))?;
        self.inner
            .executor
            .send_json(Method::DELETE, url, None)
            .await?;
        self.inner.cache.clear();
        Ok(())
    }

    // =========================================================================
    // Alerts
    // =========================================================================

    /// Alerts raised for one truck
    #[instrument(skip(self))]
    pub async fn alerts_for_truck(&self, truck_id: i64) -> Vec<Alert> {
        if self.inner.offline.mock_active() {
            return fixtures::alerts_for_truck(truck_id);
        }
        match self.fetch(&format!("alerta/{}", truck_id)).await {
            Ok(alerts) => alerts,
            Err(err) => self.degrade(err, || fixtures::alerts_for_truck(truck_id), Vec::new),
        }
    }

    /// All alerts across the fleet, synthesized like [`list_maintenance`]
    ///
    /// [`list_maintenance`]: FleetClient::list_maintenance
    #[instrument(skip(self))]
    pub async fn list_alerts(&self) -> Vec<Alert> {
        if self.inner.offline.mock_active() {
            return fixtures::alerts();
        }
        let fetches = self.inner.config.scan_truck_ids.iter().map(|id| {
            let path = format!("alerta/{}", id);
            async move { self.fetch::<Vec<Alert>>(&path).await }
        });
        let results = future::join_all(fetches).await;
        self.collect_fanout(results, fixtures::alerts)
    }

    /// Raise an alert for a truck. Errors propagate to the caller.
    #[instrument(skip(self, draft))]
    pub async fn create_alert(&self, truck_id: i64, draft: &AlertDraft) -> Result<Alert> {
        if self.inner.offline.mock_active() {
            return Ok(Alert {
                id: Some(fixtures::simulated_id()),
                title: Some(draft.title.clone()),
                category: Some(draft.category.clone()),
                description: Some(draft.description.clone()),
                truck_id: Some(truck_id),
            });
        }
        let url = self.url(&format!("alerta/{}", truck_id))?;
        let body = to_body(draft)?;
        let value = self
            .inner
            .executor
            .send_json(Method::POST, url, Some(body))
            .await?;
        self.inner.cache.clear();
        from_value(value)
    }

    // =========================================================================
    // Trucks
    // =========================================================================

    /// All trucks in the fleet
    #[instrument(skip(self))]
    pub async fn list_trucks(&self) -> Vec<Truck> {
        if self.inner.offline.mock_active() {
            return fixtures::trucks();
        }
        match self.fetch("caminhoes").await {
            Ok(trucks) => trucks,
            Err(err) => self.degrade(err, fixtures::trucks, Vec::new),
        }
    }

    /// One truck by id
    #[instrument(skip(self))]
    pub async fn truck(&self, id: i64) -> Option<Truck> {
        if self.inner.offline.mock_active() {
            return fixtures::truck(id);
        }
        match self.fetch(&format!("caminhoes/{}", id)).await {
            Ok(truck) => Some(truck),
            Err(err) => self.degrade(err, || fixtures::truck(id), || None),
        }
    }

    // =========================================================================
    // Routes, positions, history
    // =========================================================================

    /// Live coordinates of a truck
    #[instrument(skip(self))]
    pub async fn position(&self, truck_id: i64) -> Option<Position> {
        if self.inner.offline.mock_active() {
            return Some(fixtures::position(truck_id));
        }
        match self.fetch(&format!("maps/{}", truck_id)).await {
            Ok(position) => Some(position),
            Err(err) => self.degrade(err, || Some(fixtures::position(truck_id)), || None),
        }
    }

    /// Planned route waypoints for a truck
    #[instrument(skip(self))]
    pub async fn route(&self, truck_id: i64) -> Vec<Waypoint> {
        if self.inner.offline.mock_active() {
            return fixtures::route(truck_id);
        }
        match self.fetch(&format!("rota_caminhao/{}", truck_id)).await {
            Ok(waypoints) => waypoints,
            Err(err) => self.degrade(err, || fixtures::route(truck_id), Vec::new),
        }
    }

    /// Modification/accident/upgrade history of a vehicle
    #[instrument(skip(self))]
    pub async fn vehicle_history(&self, truck_id: i64) -> VehicleHistory {
        if self.inner.offline.mock_active() {
            return fixtures::vehicle_history(truck_id);
        }
        match self
            .fetch(&format!("veiculos/{}/historico", truck_id))
            .await
        {
            Ok(history) => history,
            Err(err) => self.degrade(
                err,
                || fixtures::vehicle_history(truck_id),
                VehicleHistory::default,
            ),
        }
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Send a raw prompt to the chat endpoint
    pub async fn generate_report(&self, prompt: &str) -> Result<String> {
        self.inner.chat.ask(prompt).await
    }

    /// AI-authored fleet maintenance summary; never fails.
    ///
    /// Offline mode or a failing chat endpoint degrade to a locally
    /// composed summary over the same records.
    #[instrument(skip(self))]
    pub async fn maintenance_report(&self) -> String {
        let records = self.list_maintenance().await;
        if self.inner.offline.mock_active() {
            return report::fallback_report(&records);
        }
        let prompt = report::report_prompt(&records);
        match self.inner.chat.ask(&prompt).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "chat endpoint failed, composing local report");
                report::fallback_report(&records)
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn url(&self, path: &str) -> Result<Url> {
        self.inner.base_url.join(path).map_err(Into::into)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let value = self.inner.executor.get_json(url).await?;
        from_value(value)
    }

    /// The uniform read-path degrade policy: a connectivity-class error
    /// flips offline mode and serves the fixture; any other error serves
    /// the best-effort fallback. Reads never surface an error.
    fn degrade<T>(
        &self,
        err: ApiError,
        fixture: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if err.is_connectivity() {
            warn!(error = %err, "backend unreachable, switching to offline fixtures");
            self.inner.offline.enable_mock();
            fixture()
        } else {
            warn!(error = %err, "read failed, serving fallback data");
            fallback()
        }
    }

    /// Flatten an allSettled-style fan-out: fulfilled results are appended,
    /// failures dropped. A connectivity failure flips offline mode; if
    /// nothing fulfilled by then, the fixture set stands in.
    fn collect_fanout<T>(
        &self,
        results: Vec<Result<Vec<T>>>,
        fixture: impl FnOnce() -> Vec<T>,
    ) -> Vec<T> {
        let mut out = Vec::new();
        let mut unreachable = false;
        for result in results {
            match result {
                Ok(mut items) => out.append(&mut items),
                Err(err) => {
                    if err.is_connectivity() {
                        unreachable = true;
                    }
                    debug!(error = %err, "dropping failed per-truck fetch");
                }
            }
        }
        if unreachable {
            warn!("backend unreachable during fan-out, switching to offline fixtures");
            self.inner.offline.enable_mock();
            if out.is_empty() {
                return fixture();
            }
        }
        out
    }
}

fn to_body<T: serde::Serialize>(draft: &T) -> Result<Value> {
    serde_json::to_value(draft).map_err(|e| ApiError::Parse(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: Option<Value>) -> Result<T> {
    serde_json::from_value(value.unwrap_or(Value::Null)).map_err(|e| ApiError::Parse(e.to_string()))
}

fn simulated_maintenance(id: i64, draft: &MaintenanceDraft) -> Maintenance {
    Maintenance {
        id,
        service: Some(draft.service.clone()),
        cost: Some(draft.cost),
        started_at: draft.started_at,
        completed_at: draft.completed_at,
        truck: draft.truck_id.map(|truck_id| TruckRef {
            id: truck_id,
            plate: fixtures::truck(truck_id).and_then(|t| t.plate),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FleetClient {
        // Port 1 is never served; these tests exercise only local state.
        FleetClient::new(ClientConfig::new("http://127.0.0.1:1/v1/api")).unwrap()
    }

    #[test]
    fn test_degrade_connectivity_enables_offline_mode() {
        let client = client();
        let out = client.degrade(
            ApiError::Connection("refused".into()),
            || vec![1],
            Vec::new,
        );
        assert_eq!(out, vec![1]);
        assert!(client.offline());
    }

    #[test]
    fn test_degrade_other_errors_keep_online() {
        let client = client();
        let out = client.degrade(ApiError::server_error(500, "boom"), || vec![1], Vec::new);
        assert!(out.is_empty());
        assert!(!client.offline());
    }

    #[test]
    fn test_collect_fanout_flattens_and_drops_failures() {
        let client = client();
        let out = client.collect_fanout(
            vec![
                Ok(vec![1, 2]),
                Err(ApiError::server_error(404, "missing")),
                Ok(vec![3]),
            ],
            Vec::new,
        );
        assert_eq!(out, vec![1, 2, 3]);
        assert!(!client.offline());
    }

    #[test]
    fn test_collect_fanout_connectivity_serves_fixture_when_empty() {
        let client = client();
        let out = client.collect_fanout(
            vec![Err(ApiError::Connection("refused".into()))],
            || vec![9],
        );
        assert_eq!(out, vec![9]);
        assert!(client.offline());
    }

    #[test]
    fn test_collect_fanout_keeps_partial_results_on_connectivity() {
        let client = client();
        let out = client.collect_fanout(
            vec![Ok(vec![1]), Err(ApiError::Connection("refused".into()))],
            || vec![9],
        );
        assert_eq!(out, vec![1]);
        assert!(client.offline());
    }

    #[test]
    fn test_simulated_maintenance_echo() {
        let draft = MaintenanceDraft {
            service: "Troca de óleo".into(),
            cost: 350.0,
            started_at: None,
            completed_at: None,
            truck_id: Some(1),
        };
        let record = simulated_maintenance(1000, &draft);
        assert_eq!(record.id, 1000);
        assert_eq!(record.service.as_deref(), Some("Troca de óleo"));
        assert_eq!(record.truck.as_ref().map(|t| t.id), Some(1));
        assert_eq!(
            record.truck.and_then(|t| t.plate).as_deref(),
            Some("ABC-1234")
        );
    }
}
