//! Response cache subsystem.
//!
//! # Data Flow
//! ```text
//! request (method, uri) + UpstreamTarget
//!     → key.rs (CacheKey per KeyPolicy)
//!     → store.rs (CacheStore::get → live entry or None)
//!     → on cacheable upstream success: CacheStore::put (wholesale replace)
//! ```
//!
//! # Design Decisions
//! - Entries expire by time only; no size bound, no LRU
//! - Stale entries read as absent but are only removed on overwrite or purge
//! - The store is injected as `Arc<dyn CacheStore>` so tests can observe it

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::{CacheStore, CachedResponse, ResponseCache};
