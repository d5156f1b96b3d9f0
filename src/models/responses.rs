//! Response DTOs for the worker endpoints
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheSummary, InterceptStats};
use crate::config::WorkerConfig;
use crate::worker::WorkerState;

/// Response body for GET /_worker/state
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    /// Current lifecycle state
    pub state: WorkerState,
    /// Cache name of this worker version
    pub cache_name: String,
    /// Resources pre-fetched on install
    pub manifest: Vec<String>,
}

impl StateResponse {
    pub fn new(state: WorkerState, config: &WorkerConfig) -> Self {
        Self {
            state,
            cache_name: config.cache_name.clone(),
            manifest: config.manifest.clone(),
        }
    }
}

/// Response body for GET /_worker/caches
#[derive(Debug, Clone, Serialize)]
pub struct CachesResponse {
    pub caches: Vec<CacheSummary>,
}

/// Response body for GET /_worker/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Requests served from cache
    pub hits: u64,
    /// Requests forwarded to the network
    pub misses: u64,
    /// Forwarded requests that failed
    pub network_failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<InterceptStats> for StatsResponse {
    fn from(stats: InterceptStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            network_failures: stats.network_failures,
        }
    }
}

/// Response body for GET /_worker/health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_response_serialize() {
        let resp = StateResponse::new(WorkerState::Activated, &WorkerConfig::default());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["state"], "activated");
        assert_eq!(json["cache_name"], "pwa-cache-v1");
        assert_eq!(json["manifest"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_stats_response_from_stats() {
        let mut stats = InterceptStats::new();
        for _ in 0..4 {
            stats.record_hit();
        }
        stats.record_miss();
        let resp = StatsResponse::from(stats);
        assert_eq!(resp.hits, 4);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
