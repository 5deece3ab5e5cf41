//! Integration tests for the fleet client
//!
//! The tests exercise the full client against scripted in-process backends:
//! - Session lifecycle (single-flight login, persisted sessions)
//! - Response cache (TTL, write invalidation)
//! - Retry policy (token refresh, 5xx backoff, timeouts)
//! - Offline escalation and fixture fallback
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p frota-tests
//! ```
//!
//! # Test Structure
//!
//! - `client_integration_test.rs` - happy paths, cache, fixtures, reports
//! - `resilience_test.rs` - failure classification and retry behavior

use std::sync::atomic::{AtomicUsize, Ordering};

use frota_client::testing::TestServer;
use frota_client::{ClientConfig, FleetClient};

/// Request counters shared with a scripted backend
#[derive(Default)]
pub struct Counters {
    pub logins: AtomicUsize,
    pub data: AtomicUsize,
    pub probes: AtomicUsize,
}

impl Counters {
    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn data(&self) -> usize {
        self.data.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn hit(counter: &AtomicUsize) -> usize {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Client configuration tuned for tests: real semantics, short budgets
pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig::builder(base_url)
        .credentials("svc", "secret")
        .request_timeout_ms(2_000)
        .login_timeout_ms(2_000)
        .probe_timeout_ms(1_000)
        .server_backoff_ms(10)
        .timeout_backoff_ms(10)
        .build()
}

/// Spin up a scripted backend and a client pointed at its `/v1/api` base
pub async fn start(router: axum::Router) -> (TestServer, FleetClient) {
    let server = TestServer::start(router).await.expect("test server");
    let config = test_config(&format!("{}/v1/api", server.base_url()));
    let client = FleetClient::new(config).expect("fleet client");
    (server, client)
}

/// A base URL nothing listens on (connectivity-class failures on contact)
pub async fn unreachable_base_url() -> String {
    // Bind an ephemeral port, then drop the listener so connections are
    // refused rather than timed out.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/v1/api", addr)
}

/// JSON body for one maintenance record in the backend's wire format
pub fn maintenance_json(id: i64, truck_id: i64, cost: f64, open: bool) -> serde_json::Value {
    let completed = if open {
        serde_json::Value::Null
    } else {
        serde_json::Value::String("2024-10-08T00:00:00.000Z".to_string())
    };
    serde_json::json!({
        "id": id,
        "descServico": "Troca de óleo",
        "custo": cost,
        "dataInicio": "2024-10-07T00:00:00.000Z",
        "dataConclusao": completed,
        "caminhao": { "id": truck_id, "placa": "ABC-1234" }
    })
}
