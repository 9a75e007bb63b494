//! Caching Reverse Proxy Library
//!
//! Forwards every request to one fixed upstream origin and serves repeat
//! requests from a short-lived in-memory cache.

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use cache::{CacheStore, ResponseCache};
pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
