//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → forward.rs (cache lookup / upstream call)
//!         → rewrite.rs (retarget at the upstream, strip hop-by-hop headers)
//!         → response.rs (build response, map errors to status codes)
//!     → Send to client
//! ```

pub mod forward;
pub mod headers;
pub mod request;
pub mod response;
pub mod rewrite;
pub mod server;

pub use forward::Forwarder;
pub use headers::X_FORWARDED_FOR;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::ForwardError;
pub use server::{AppState, HttpServer};
