//! API Handlers
//!
//! Worker introspection endpoints and the proxy handler that routes every
//! other request through the registration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::Response,
    Json,
};
use http_body_util::LengthLimitError;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::cache::CacheStorage;
use crate::client::version::{fetch_version, VersionBadge, VERSION_PATH};
use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::fetch::{is_hop_by_hop, FetchRequest, HttpFetcher};
use crate::models::{CachesResponse, HealthResponse, StateResponse, StatsResponse};
use crate::worker::{FetchOutcome, Registration, ServiceWorker};

/// Largest request body the proxy buffers.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Response header naming where a proxied response came from.
pub const SOURCE_HEADER: &str = "x-pwa-cache";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The worker registration every proxied request goes through
    pub registration: Arc<Registration<ServiceWorker>>,
    /// Client for auxiliary upstream calls
    pub client: Client,
    /// Upstream origin
    pub upstream: Url,
}

impl AppState {
    pub fn new(registration: Registration<ServiceWorker>, client: Client, upstream: Url) -> Self {
        Self {
            registration: Arc::new(registration),
            client,
            upstream,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Loads the cache snapshot if one is configured and wires the worker to
    /// an HTTP fetcher for the upstream. The lifecycle is not run here.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let storage = match &config.snapshot_path {
            Some(path) => CacheStorage::with_snapshot(path).await?,
            None => CacheStorage::new(),
        };
        let fetcher = Arc::new(HttpFetcher::new(
            &config.upstream_url,
            Duration::from_secs(config.fetch_timeout),
        )?);
        let client = fetcher.client().clone();
        let upstream = fetcher.base().clone();

        let worker = ServiceWorker::new(config.worker(), storage, fetcher.clone());
        Ok(Self::new(Registration::new(worker, fetcher), client, upstream))
    }
}

/// Handler for GET /_worker/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /_worker/state
pub async fn state_handler(State(state): State<AppState>) -> Json<StateResponse> {
    let registration = &state.registration;
    Json(StateResponse::new(
        registration.state().await,
        registration.handler().config(),
    ))
}

/// Handler for GET /_worker/caches
pub async fn caches_handler(State(state): State<AppState>) -> Json<CachesResponse> {
    let caches = state.registration.handler().storage().summaries().await;
    Json(CachesResponse { caches })
}

/// Handler for GET /_worker/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.registration.handler().stats().await;
    Json(StatsResponse::from(stats))
}

/// Handler for GET /_worker/version
///
/// Renders the upstream app's version badge.
pub async fn version_handler(State(state): State<AppState>) -> Result<Json<VersionBadge>> {
    fetch_version(&state.client, &state.upstream)
        .await
        .map(Json)
        .ok_or_else(|| WorkerError::fetch(VERSION_PATH, "version unavailable"))
}

/// Fallback handler: every request not aimed at the worker endpoints.
pub async fn proxy_handler(State(state): State<AppState>, request: Request) -> Result<Response> {
    let fetch_request = into_fetch_request(request).await?;
    let outcome = state.registration.handle_fetch(&fetch_request).await?;
    debug!(
        "{} {} served from {}",
        fetch_request.method,
        fetch_request.url,
        outcome.source()
    );
    relay(outcome)
}

/// Buffers an incoming request into the worker's request form.
async fn into_fetch_request(request: Request) -> Result<FetchRequest> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(body_error)?;
    let url = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let mut fetch_request = FetchRequest::new(parts.method.as_str(), url).with_body(bytes.to_vec());
    for (name, value) in parts.headers.iter() {
        if let Ok(value) = value.to_str() {
            fetch_request = fetch_request.with_header(name.as_str(), value);
        }
    }
    Ok(fetch_request)
}

fn body_error(err: axum::Error) -> WorkerError {
    let inner = err.into_inner();
    if inner.is::<LengthLimitError>() {
        WorkerError::PayloadTooLarge {
            limit: MAX_BODY_BYTES,
        }
    } else {
        WorkerError::InvalidRequest(format!("unreadable body: {}", inner))
    }
}

/// Turns a worker outcome back into an HTTP response, tagging its source.
fn relay(outcome: FetchOutcome) -> Result<Response> {
    let source = outcome.source();
    let upstream = outcome.into_inner();
    let status = StatusCode::from_u16(upstream.status)
        .map_err(|_| WorkerError::Internal(format!("bad upstream status {}", upstream.status)))?;

    let mut builder = Response::builder().status(status);
    for (name, value) in &upstream.headers {
        if !is_hop_by_hop(name) {
            builder = builder.header(name, value);
        }
    }

    builder
        .header(SOURCE_HEADER, source)
        .body(Body::from(upstream.body))
        .map_err(|e| WorkerError::Internal(e.to_string()))
}
