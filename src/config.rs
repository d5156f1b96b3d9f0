//! Configuration Module
//!
//! Handles loading the proxy configuration from environment variables and
//! deriving the immutable worker configuration from it.

use std::env;
use std::path::PathBuf;

// == Defaults ==
/// Cache name of the current worker version. Bumping it invalidates every
/// older cache on the next activation.
pub const DEFAULT_CACHE_NAME: &str = "pwa-cache-v1";

/// Resources pre-fetched into the cache at install time.
pub const DEFAULT_MANIFEST: &[&str] = &[
    "/",
    "/apply",
    "/about",
    "/assets/icons/android-chrome-192x192.png",
    "/assets/icons/android-chrome-512x512.png",
    "/assets/utils.js",
];

const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_FETCH_TIMEOUT: u64 = 30;

// == Worker Config ==
/// Version-scoped worker configuration, fixed for the lifetime of a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Name of the cache owned by this worker version
    pub cache_name: String,
    /// Ordered list of paths to pre-fetch on install
    pub manifest: Vec<String>,
}

impl WorkerConfig {
    pub fn new(cache_name: impl Into<String>, manifest: Vec<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            manifest,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CACHE_NAME,
            DEFAULT_MANIFEST.iter().map(|s| s.to_string()).collect(),
        )
    }
}

// == Config ==
/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the current cache version
    pub cache_name: String,
    /// Paths pre-fetched on install
    pub manifest: Vec<String>,
    /// Origin the proxy forwards cache misses to
    pub upstream_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Where cache storage is persisted between runs, if anywhere
    pub snapshot_path: Option<PathBuf>,
    /// Upstream request timeout in seconds
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAME` - Current cache version name (default: pwa-cache-v1)
    /// - `CACHE_MANIFEST` - Comma-separated paths to pre-fetch
    /// - `UPSTREAM_URL` - Origin to forward misses to (default: http://127.0.0.1:8080)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_SNAPSHOT` - Snapshot file path (default: unset, memory only)
    /// - `FETCH_TIMEOUT` - Upstream timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_name: env::var("CACHE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_name),
            manifest: env::var("CACHE_MANIFEST")
                .ok()
                .map(|v| parse_manifest(&v))
                .filter(|m| !m.is_empty())
                .unwrap_or(defaults.manifest),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            snapshot_path: env::var("CACHE_SNAPSHOT")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            fetch_timeout: env::var("FETCH_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout),
        }
    }

    /// Returns the worker-scoped slice of this configuration.
    pub fn worker(&self) -> WorkerConfig {
        WorkerConfig::new(self.cache_name.clone(), self.manifest.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        let worker = WorkerConfig::default();
        Self {
            cache_name: worker.cache_name,
            manifest: worker.manifest,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            snapshot_path: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Splits a comma-separated manifest, dropping blank items.
fn parse_manifest(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
