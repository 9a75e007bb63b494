//! In-memory response store with TTL expiry.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::HeaderValue;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::cache::key::CacheKey;
use crate::observability::metrics;

/// A captured upstream response body.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub body: Bytes,
    pub content_type: Option<HeaderValue>,
    pub expires_at: Instant,
}

impl CachedResponse {
    /// Snapshot a body that stays live for `ttl` from now.
    pub fn new(body: Bytes, content_type: Option<HeaderValue>, ttl: Duration) -> Self {
        Self {
            body,
            content_type,
            expires_at: Instant::now() + ttl,
        }
    }

    /// An entry is live strictly before its expiry instant.
    pub fn is_live_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn is_live(&self) -> bool {
        self.is_live_at(Instant::now())
    }
}

/// Shared storage for cached responses.
///
/// Implementations must make `get` and `put` safe to call from any number of
/// concurrent request handlers.
pub trait CacheStore: Send + Sync {
    /// Return the entry for `key` if it exists and is still live.
    fn get(&self, key: &CacheKey) -> Option<CachedResponse>;

    /// Store `entry`, replacing whatever was held for `key`.
    fn put(&self, key: CacheKey, entry: CachedResponse);
}

/// A thread-safe response cache backed by `DashMap`.
///
/// Stale entries are not removed on read; they stay until overwritten or
/// until `purge_expired` runs.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<CacheKey, CachedResponse>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, live or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the stored entry for `key` regardless of expiry.
    pub fn peek(&self, key: &CacheKey) -> Option<CachedResponse> {
        self.entries.get(key).map(|r| r.value().clone())
    }

    /// Drop every entry that is no longer live. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let live = entry.is_live_at(now);
            if !live {
                removed += 1;
            }
            live
        });
        metrics::record_cache_size(self.entries.len());
        removed
    }
}

impl CacheStore for ResponseCache {
    fn get(&self, key: &CacheKey) -> Option<CachedResponse> {
        let entry = self.entries.get(key)?;
        if entry.is_live() {
            Some(entry.value().clone())
        } else {
            None
        }
    }

    fn put(&self, key: CacheKey, entry: CachedResponse) {
        self.entries.insert(key, entry);
        metrics::record_cache_size(self.entries.len());
    }
}
