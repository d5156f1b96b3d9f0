//! Intercept Statistics Module
//!
//! Tracks how the request interceptor answered: from cache or from network.

use serde::Serialize;

// == Intercept Stats ==
/// Counters for intercepted requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InterceptStats {
    /// Requests answered from a cache
    pub hits: u64,
    /// Requests forwarded to the network
    pub misses: u64,
    /// Forwarded requests whose network fetch failed
    pub network_failures: u64,
}

impl InterceptStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing was intercepted.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_network_failure(&mut self) {
        self.network_failures += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = InterceptStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.network_failures, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(InterceptStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = InterceptStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_network_failures_do_not_affect_hit_rate() {
        let mut stats = InterceptStats::new();
        stats.record_miss();
        stats.record_network_failure();
        assert_eq!(stats.network_failures, 1);
        assert_eq!(stats.hit_rate(), 0.0);
    }
}
