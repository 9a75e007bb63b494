//! Response construction and error mapping.
//!
//! # Responsibilities
//! - Build the client response from a cached or freshly read body
//! - Map forwarding failures to HTTP status codes
//!
//! # Design Decisions
//! - Transport failures surface as 502, body read failures as 500
//! - Upstream statuses >= 400 are relayed with an empty body

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::cache::CachedResponse;
use crate::http::headers::set_forwarded_for;

/// A per-request forwarding failure.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The upstream could not be reached or the exchange broke off.
    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
    /// The upstream answered but its body could not be read in full.
    #[error("failed to read upstream body: {0}")]
    BodyRead(#[source] axum::Error),
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::Transport(_) => StatusCode::BAD_GATEWAY,
            ForwardError::BodyRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let message = match &self {
            ForwardError::Transport(_) => "Upstream request failed",
            ForwardError::BodyRead(_) => "Failed to read upstream response",
        };
        (self.status(), message).into_response()
    }
}

/// Response carrying a buffered upstream body.
pub fn body_response(
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: Bytes,
    remote: SocketAddr,
) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    if let Some(content_type) = content_type {
        headers.insert(header::CONTENT_TYPE, content_type);
    }
    set_forwarded_for(headers, remote);
    response
}

/// Response served straight from the cache. Always 200.
pub fn cached_response(entry: CachedResponse, remote: SocketAddr) -> Response {
    body_response(StatusCode::OK, entry.content_type, entry.body, remote)
}

/// Relay an upstream error status without its body.
pub fn upstream_error_response(status: StatusCode) -> Response {
    status.into_response()
}
