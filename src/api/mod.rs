//! API Module
//!
//! HTTP handlers and routing for the offline-first proxy.
//!
//! # Endpoints
//! - `GET /_worker/health` - Health check endpoint
//! - `GET /_worker/state` - Worker lifecycle state
//! - `GET /_worker/caches` - Cache listing
//! - `GET /_worker/stats` - Interceptor statistics
//! - `GET /_worker/version` - Upstream version badge
//! - fallback - cache-first proxy to the upstream

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
