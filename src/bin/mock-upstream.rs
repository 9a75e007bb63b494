//! A stand-in origin for trying the proxy locally.
//!
//! Listens on the proxy's default upstream address and counts the requests
//! it serves, which makes cache hits visible.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let hits = Arc::new(AtomicU64::new(0));
    let app = Router::new()
        .route("/", get(root))
        .route("/status", get(|| async { "Upstream is healthy" }))
        .route("/fail", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }))
        .with_state(hits);

    let addr = SocketAddr::from(([127, 0, 0, 1], 55000));
    tracing::info!(address = %addr, "Mock upstream listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn root(State(hits): State<Arc<AtomicU64>>) -> String {
    let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::info!(served = n, "Served request");
    format!("Hello from the upstream (request #{n})\n")
}
