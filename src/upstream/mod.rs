//! Upstream origin subsystem.
//!
//! # Data Flow
//! ```text
//! upstream.url (config)
//!     → target.rs (parse once, immutable UpstreamTarget)
//!     → client.rs (pooled hyper client)
//!     → used by http::forward for every cache miss
//! ```

pub mod client;
pub mod target;

pub use client::{build_client, UpstreamClient};
pub use target::{TargetError, UpstreamTarget};
