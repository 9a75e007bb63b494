//! Request retargeting.
//!
//! # Responsibilities
//! - Point the request URI at the upstream scheme and authority
//! - Replace the Host header with the upstream host
//! - Drop connection-scoped state that does not survive re-issuing
//!
//! Method, path, query, end-to-end headers and body pass through untouched.

use std::net::SocketAddr;

use axum::http::{
    header,
    uri::{PathAndQuery, Uri},
    HeaderValue, Request, Version,
};

use crate::http::headers::strip_hop_by_hop;
use crate::upstream::UpstreamTarget;

/// Retarget `request` at `target`.
///
/// The outbound URI is always rebuilt from the target's scheme and authority
/// plus the inbound path and query; whatever absolute form the client sent
/// is discarded.
pub fn rewrite_request<B>(request: &mut Request<B>, target: &UpstreamTarget, remote: SocketAddr) {
    let mut parts = request.uri().clone().into_parts();
    parts.scheme = Some(target.scheme().clone());
    parts.authority = Some(target.authority().clone());
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }

    // The pooled upstream connection speaks HTTP/1.1 regardless of how the
    // caller connected.
    *request.version_mut() = Version::HTTP_11;

    let headers = request.headers_mut();
    strip_hop_by_hop(headers);
    if let Ok(host) = HeaderValue::from_str(target.host()) {
        headers.insert(header::HOST, host);
    }

    tracing::info!(
        host = %target.host(),
        method = %request.method(),
        path = %request.uri().path(),
        remote_addr = %remote,
        "Received request"
    );
}
