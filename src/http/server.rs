//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the watchlist handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests to the watchlist service

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::GatewayConfig;
use crate::http::request::{extract_query, request_id, MakeRequestUuidV4};
use crate::observability::metrics;
use crate::store::{DocumentLocator, DocumentStore, JsonBlobStore, StoreError};
use crate::watchlist::{Outcome, Query, WatchlistError, WatchlistRequest, WatchlistService};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid store URL '{url}': {source}")]
    StoreUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build store client: {0}")]
    StoreClient(#[from] StoreError),
}

/// Application state injected into handlers.
pub struct AppState<S> {
    pub service: Arc<WatchlistService<S>>,
    pub body_limit: usize,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            body_limit: self.body_limit,
        }
    }
}

/// HTTP server for the watchlist gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server talking to the document store named in `config`.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let base = store_base(&config)?;
        let store = JsonBlobStore::new(base, Duration::from_secs(config.store.timeout_secs))?;
        Self::with_store(config, store)
    }

    /// Create a server on top of an already constructed store.
    pub fn with_store<S: DocumentStore>(config: GatewayConfig, store: S) -> Result<Self, ServerError> {
        let locator = DocumentLocator::new(store_base(&config)?);
        let state = AppState {
            service: Arc::new(WatchlistService::new(store, locator)),
            body_limit: config.security.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<S: DocumentStore>(config: &GatewayConfig, state: AppState<S>) -> Router {
        Router::new()
            .route(&config.listener.route, any(watchlist_handler::<S>))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            route = %self.config.listener.route,
            store = %self.config.store.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

fn store_base(config: &GatewayConfig) -> Result<Url, ServerError> {
    Url::parse(&config.store.base_url).map_err(|source| ServerError::StoreUrl {
        url: config.store.base_url.clone(),
        source,
    })
}

/// Single entry point for every watchlist action.
async fn watchlist_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();

    let (action, result) = dispatch(&state, request).await;
    let response = match result {
        Ok(outcome) => outcome.into_response(),
        Err(e) => e.into_response(),
    };

    let status = response.status().as_u16();
    metrics::record_request(action, status, start_time);
    tracing::info!(
        method = %method,
        action,
        status,
        elapsed = ?start_time.elapsed(),
        "Watchlist request handled"
    );
    response
}

async fn dispatch<S: DocumentStore>(
    state: &AppState<S>,
    request: Request<Body>,
) -> (&'static str, Result<Outcome, WatchlistError>) {
    let query = match extract_query(request, state.body_limit).await {
        Ok(query) => query,
        Err(e) => {
            tracing::debug!(error = %e, "Could not parse request parameters");
            return ("unparsed", Err(e.into()));
        }
    };

    let action = action_label(&query);
    let result = match WatchlistRequest::try_from(&query) {
        Ok(request) => state.service.execute(request).await,
        Err(e) => Err(e),
    };
    (action, result)
}

fn action_label(query: &Query) -> &'static str {
    match query.get("action") {
        Some("new") => "new",
        Some("add") => "add",
        Some("remove") => "remove",
        _ => "invalid",
    }
}
