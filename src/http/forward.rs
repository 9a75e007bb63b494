//! Cache-aware forwarding.
//!
//! # Flow
//! ```text
//! request → rewrite → cache lookup
//!     hit  → 200 + stored body
//!     miss → upstream call
//!              transport error → 502
//!              status >= 400   → status, empty body (not cached)
//!              status <  400   → read body → store → status + body
//!                                (read error → 500, not cached)
//! ```
//!
//! Two requests racing on the same miss may both reach the upstream; the
//! later store simply replaces the earlier one.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::{IntoResponse, Response},
};

use crate::cache::{CacheKey, CacheStore, CachedResponse};
use crate::config::CacheConfig;
use crate::http::request::request_id;
use crate::http::response::{body_response, cached_response, upstream_error_response, ForwardError};
use crate::http::rewrite::rewrite_request;
use crate::observability::metrics::{self, ResponseSource};
use crate::upstream::{UpstreamClient, UpstreamTarget};

/// Per-request fields carried into every log record.
struct RequestLog {
    id: String,
    method: Method,
    path: String,
    remote: SocketAddr,
}

/// Answers requests from the cache or the upstream.
pub struct Forwarder {
    target: UpstreamTarget,
    client: UpstreamClient,
    cache: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl Forwarder {
    pub fn new(
        target: UpstreamTarget,
        client: UpstreamClient,
        cache: Arc<dyn CacheStore>,
        config: CacheConfig,
    ) -> Self {
        Self {
            target,
            client,
            cache,
            config,
        }
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.ttl_secs)
    }

    /// Handle one inbound request end to end.
    pub async fn forward(&self, mut request: Request<Body>, remote: SocketAddr) -> Response {
        let start = Instant::now();
        let log = RequestLog {
            id: request_id(&request).to_string(),
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            remote,
        };

        rewrite_request(&mut request, &self.target, remote);

        let key = self.config.enabled.then(|| {
            CacheKey::for_request(self.config.key_policy, &self.target, &log.method, request.uri())
        });

        let (response, source) = match key.as_ref().and_then(|k| self.lookup(k, &log)) {
            Some(entry) => (cached_response(entry, remote), ResponseSource::Cache),
            None => match self.fetch(request, key, &log).await {
                Ok(response) => (response, ResponseSource::Upstream),
                Err(e) => (e.into_response(), ResponseSource::Proxy),
            },
        };

        let status = response.status();
        metrics::record_request(log.method.as_str(), status.as_u16(), source, start);
        tracing::info!(
            request_id = %log.id,
            method = %log.method,
            path = %log.path,
            status = status.as_u16(),
            "Completed request"
        );
        response
    }

    fn lookup(&self, key: &CacheKey, log: &RequestLog) -> Option<CachedResponse> {
        let entry = self.cache.get(key);
        metrics::record_cache_lookup(entry.is_some());
        match &entry {
            Some(_) => tracing::info!(
                request_id = %log.id,
                key = %key,
                remote_addr = %log.remote,
                "Cache hit"
            ),
            None => tracing::debug!(request_id = %log.id, key = %key, "Cache miss"),
        }
        entry
    }

    async fn fetch(
        &self,
        request: Request<Body>,
        key: Option<CacheKey>,
        log: &RequestLog,
    ) -> Result<Response, ForwardError> {
        let response = self.client.request(request).await.map_err(|e| {
            tracing::error!(
                request_id = %log.id,
                upstream = %self.target,
                error = %e,
                "Failed to proxy request"
            );
            ForwardError::Transport(e)
        })?;

        let status = response.status();
        if status.as_u16() >= 400 {
            tracing::error!(
                request_id = %log.id,
                status = status.as_u16(),
                method = %log.method,
                path = %log.path,
                remote_addr = %log.remote,
                "Upstream returned error status"
            );
            return Ok(upstream_error_response(status));
        }

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), self.config.max_body_bytes)
            .await
            .map_err(|e| {
                tracing::error!(
                    request_id = %log.id,
                    status = status.as_u16(),
                    error = %e,
                    "Failed to read upstream body"
                );
                ForwardError::BodyRead(e)
            })?;
        let content_type = parts.headers.get(header::CONTENT_TYPE).cloned();

        if let Some(key) = key {
            tracing::debug!(
                request_id = %log.id,
                key = %key,
                bytes = body.len(),
                ttl_secs = self.config.ttl_secs,
                "Caching upstream response"
            );
            self.cache.put(
                key,
                CachedResponse::new(body.clone(), content_type.clone(), self.ttl()),
            );
        }

        Ok(body_response(status, content_type, body, log.remote))
    }
}
