//! Cache key derivation.

use std::fmt;

use axum::http::{Method, Uri};

use crate::config::KeyPolicy;
use crate::upstream::UpstreamTarget;

/// Identifier of a cached upstream response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a request bound for `target`.
    pub fn for_request(
        policy: KeyPolicy,
        target: &UpstreamTarget,
        method: &Method,
        uri: &Uri,
    ) -> Self {
        match policy {
            KeyPolicy::PerUpstream => Self(target.host().to_string()),
            KeyPolicy::PerPath => {
                let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
                Self(format!("{} {}{}", method, target.host(), path))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
