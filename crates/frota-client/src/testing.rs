//! Test utilities for frota-client
//!
//! Provides an in-process HTTP server for exercising the client against
//! scripted backends in integration tests.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::error::{ApiError, Result};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start serving an axum Router on an ephemeral port
    ///
    /// # Example
    ///
    /// ```ignore
    /// use frota_client::testing::TestServer;
    ///
    /// let server = TestServer::start(router).await?;
    /// let config = ClientConfig::new(server.base_url());
    /// let client = FleetClient::new(config)?;
    /// ```
    pub async fn start<S>(router: axum::Router<S>) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let router: axum::Router = router.into();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Base URL of the test server (no trailing path)
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
