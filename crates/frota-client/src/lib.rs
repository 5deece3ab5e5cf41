//! Fleet API Client Library
//!
//! Resilient client for the fleet-management backend: bearer-session
//! lifecycle with single-flight login, backend availability detection with
//! an offline fixture mode, a retrying request executor, and a short-TTL
//! response cache behind a typed domain surface.
//!
//! # Example
//!
//! ```rust,no_run
//! use frota_client::{ClientConfig, FleetClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FleetClient::new(ClientConfig::from_env())?;
//!
//!     // Reads never fail; they degrade to bundled fixtures when the
//!     // backend is unreachable.
//!     for truck in client.list_trucks().await {
//!         println!("{} {}", truck.id, truck.plate.unwrap_or_default());
//!     }
//!
//!     // Writes propagate errors so callers can surface them.
//!     client.delete_maintenance(3).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Offline mode
//!
//! The first data request probes the backend once. If the probe (or any
//! later call) fails at the connectivity level, the client flips into
//! offline mode and every read serves the reference fixtures until
//! [`FleetClient::reset_api_state`] is called. Authentication rejections
//! never trigger offline mode — they surface as [`ApiError::AuthRejected`].
//!
//! # Testing
//!
//! The `testing` module provides an in-process server for integration
//! tests:
//!
//! ```rust,ignore
//! use frota_client::testing::TestServer;
//!
//! let server = TestServer::start(router).await?;
//! let client = FleetClient::new(ClientConfig::new(format!("{}/v1/api", server.base_url())))?;
//! ```

mod cache;
mod client;
mod config;
mod error;
mod executor;
pub mod fixtures;
mod offline;
pub mod report;
mod retry;
mod session;
mod store;
pub mod testing;

pub use cache::{ResponseCache, DEFAULT_TTL};
pub use client::FleetClient;
pub use config::{
    ChatConfig, ClientConfig, ClientConfigBuilder, ConfigError, Credentials, RetryConfig,
    TimeoutsConfig,
};
pub use error::{ApiError, Result};
pub use offline::Availability;
pub use retry::RetryPolicy;
pub use session::MOCK_TOKEN;
pub use store::TokenStore;

// Re-export core types for convenience
pub use frota_core::models::{
    Alert, AlertDraft, Driver, Maintenance, MaintenanceDraft, Position, Truck, TruckRef,
    VehicleHistory, Waypoint,
};
pub use frota_core::stats;
