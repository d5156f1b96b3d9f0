//! Cache Module
//!
//! Named request/response caches and the origin-wide storage holding them.

mod entry;
mod stats;
mod storage;
mod store;

// Re-export public types
pub use entry::{CacheEntry, RequestKey};
pub use stats::InterceptStats;
pub use storage::{CacheStorage, CacheSummary};
pub use store::Cache;
