//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing, request ID, optional timeout)
//! - Build the upstream client and response cache
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::{CacheStore, ResponseCache};
use crate::config::ProxyConfig;
use crate::http::forward::Forwarder;
use crate::http::request::UuidRequestId;
use crate::upstream::{build_client, TargetError, UpstreamTarget};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the caching proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server with a fresh, empty response cache.
    pub fn new(config: ProxyConfig) -> Result<Self, TargetError> {
        Self::with_cache(config, Arc::new(ResponseCache::new()))
    }

    /// Create a server that stores responses in `cache`.
    ///
    /// Fails if the upstream URL cannot be used.
    pub fn with_cache(config: ProxyConfig, cache: Arc<dyn CacheStore>) -> Result<Self, TargetError> {
        let target = UpstreamTarget::parse(&config.upstream.url)?;
        let client = build_client(&config.timeouts);

        tracing::info!(
            upstream = %target,
            cache_enabled = config.cache.enabled,
            ttl_secs = config.cache.ttl_secs,
            key_policy = ?config.cache.key_policy,
            "Forwarder initialized"
        );

        let state = AppState {
            forwarder: Arc::new(Forwarder::new(target, client, cache, config.cache.clone())),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state);

        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all proxy handler.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    state.forwarder.forward(request, addr).await
}
