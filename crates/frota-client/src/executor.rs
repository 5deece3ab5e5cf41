//! Request execution
//!
//! Issues HTTP calls with a per-attempt time budget, classifies the
//! outcome, and drives the retry policy in one bounded loop: a rejected
//! token buys exactly one silent re-authentication, transient 5xx and
//! timeouts retry with backoff until their budget runs out, everything else
//! propagates immediately.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::cache::ResponseCache;
use crate::error::{ApiError, Result};
use crate::retry::RetryPolicy;
use crate::session::SessionManager;

pub(crate) struct RequestExecutor {
    http: Client,
    session: Arc<SessionManager>,
    cache: Arc<ResponseCache>,
    policy: RetryPolicy,
    request_budget: Duration,
}

impl RequestExecutor {
    pub(crate) fn new(
        http: Client,
        session: Arc<SessionManager>,
        cache: Arc<ResponseCache>,
        policy: RetryPolicy,
        request_budget: Duration,
    ) -> Self {
        Self {
            http,
            session,
            cache,
            policy,
            request_budget,
        }
    }

    /// GET with cache consult; a hit returns without a network call
    pub(crate) async fn get_json(&self, url: Url) -> Result<Option<Value>> {
        self.execute(Method::GET, url, None).await
    }

    /// Issue a mutating call; the cache is never consulted or written here,
    /// invalidation is the domain layer's responsibility
    pub(crate) async fn send_json(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<Option<Value>> {
        self.execute(method, url, body).await
    }

    async fn execute(&self, method: Method, url: Url, body: Option<Value>) -> Result<Option<Value>> {
        let cache_key = ResponseCache::key(&method, &url);
        if method == Method::GET {
            if let Some(hit) = self.cache.get(&cache_key) {
                debug!(%url, "cache hit");
                return Ok(Some(hit));
            }
        }

        let mut server_retries = 0u32;
        let mut timeout_retries = 0u32;
        let mut reauthenticated = false;

        loop {
            let token = self.session.valid_token().await?;
            match self.attempt(&method, &url, body.as_ref(), &token).await {
                Ok(value) => {
                    if method == Method::GET {
                        if let Some(parsed) = &value {
                            self.cache.set(cache_key, parsed.clone());
                        }
                    }
                    return Ok(value);
                }
                Err(ApiError::TokenExpired) => {
                    if reauthenticated {
                        warn!(%url, "token rejected again after re-authentication");
                        return Err(ApiError::TokenExpired);
                    }
                    reauthenticated = true;
                    debug!(%url, "token rejected, re-authenticating");
                    self.session.invalidate().await;
                }
                Err(err) => {
                    let retries = match &err {
                        e if e.is_transient_server() => &mut server_retries,
                        ApiError::Timeout => &mut timeout_retries,
                        _ => return Err(err),
                    };
                    match self.policy.backoff(&err, *retries) {
                        Some(delay) => {
                            *retries += 1;
                            warn!(%url, error = %err, retry = *retries, "retrying after backoff");
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(err),
                    }
                }
            }
        }
    }

    async fn attempt(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&Value>,
        token: &str,
    ) -> Result<Option<Value>> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match tokio::time::timeout(self.request_budget, request.send()).await {
            Err(_) => return Err(ApiError::Timeout),
            Ok(Err(err)) => return Err(ApiError::from_transport(err)),
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::TokenExpired);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
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

        response
            .json::<Value>()
            .await
            .map(Some)
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}
