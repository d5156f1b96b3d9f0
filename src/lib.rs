//! PWA Cache - An offline-first, cache-first proxy
//!
//! Runs a service-worker style lifecycle (install, activate, fetch) over a
//! set of named response caches in front of an upstream web app.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod worker;

pub use api::AppState;
pub use config::{Config, WorkerConfig};
pub use error::{Result, WorkerError};
pub use worker::{LifecycleHandler, Registration, ServiceWorker};
