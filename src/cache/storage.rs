//! Cache Storage Module
//!
//! The origin-wide set of named caches, with optional JSON snapshot
//! persistence so caches outlive the process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{Cache, RequestKey};
use crate::error::Result;
use crate::fetch::{FetchRequest, FetchResponse};

/// On-disk form of the storage.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    caches: Vec<Cache>,
}

// == Cache Summary ==
/// Name and size of one cache, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSummary {
    pub name: String,
    pub entries: usize,
    pub bytes: usize,
}

// == Cache Storage ==
/// Shared handle over every cache known to the origin, in creation order.
///
/// Cloning is cheap; all clones see the same caches.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: Arc<RwLock<Vec<Cache>>>,
    snapshot: Option<PathBuf>,
}

impl CacheStorage {
    // == Constructors ==
    /// Creates an empty, memory-only storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage persisted at `path`, loading it if the file exists.
    pub async fn with_snapshot(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let caches = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes)?.caches,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(
            "Loaded {} cache(s) from snapshot {}",
            caches.len(),
            path.display()
        );

        Ok(Self {
            caches: Arc::new(RwLock::new(caches)),
            snapshot: Some(path),
        })
    }

    // == Open ==
    /// Opens the cache `name`, creating it if absent.
    ///
    /// Returns true when this call created the cache.
    pub async fn open(&self, name: &str) -> Result<bool> {
        let mut caches = self.caches.write().await;
        if caches.iter().any(|c| c.name() == name) {
            return Ok(false);
        }

        caches.push(Cache::new(name));
        debug!("Created cache {}", name);
        self.persist(&caches).await?;
        Ok(true)
    }

    // == Has ==
    pub async fn has(&self, name: &str) -> bool {
        self.caches.read().await.iter().any(|c| c.name() == name)
    }

    // == Keys ==
    /// Cache names in creation order.
    pub async fn keys(&self) -> Vec<String> {
        self.caches
            .read()
            .await
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    // == Delete ==
    /// Deletes the cache `name`. Returns false if no such cache existed.
    ///
    /// If the snapshot cannot be written the cache is put back and the
    /// error returned.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        let mut caches = self.caches.write().await;
        let Some(index) = caches.iter().position(|c| c.name() == name) else {
            return Ok(false);
        };

        let removed = caches.remove(index);
        if let Err(e) = self.persist(&caches).await {
            caches.insert(index, removed);
            return Err(e);
        }

        debug!("Deleted cache {}", name);
        Ok(true)
    }

    // == Put All ==
    /// Stores a batch into cache `name` under one lock, creating the cache
    /// if needed, then persists once.
    pub async fn put_all(
        &self,
        name: &str,
        batch: Vec<(RequestKey, FetchResponse)>,
    ) -> Result<usize> {
        let mut caches = self.caches.write().await;
        let index = match caches.iter().position(|c| c.name() == name) {
            Some(i) => i,
            None => {
                caches.push(Cache::new(name));
                caches.len() - 1
            }
        };

        let count = batch.len();
        caches[index].put_all(batch);
        self.persist(&caches).await?;
        Ok(count)
    }

    // == Match ==
    /// Looks `request` up in every cache, in creation order, returning the
    /// first stored response.
    pub async fn match_request(&self, request: &FetchRequest) -> Option<FetchResponse> {
        let key = RequestKey::from(request);
        self.caches
            .read()
            .await
            .iter()
            .find_map(|c| c.match_key(&key).cloned())
    }

    // == Summaries ==
    pub async fn summaries(&self) -> Vec<CacheSummary> {
        self.caches
            .read()
            .await
            .iter()
            .map(|c| CacheSummary {
                name: c.name().to_string(),
                entries: c.len(),
                bytes: c.size(),
            })
            .collect()
    }

    /// Copy of the cache `name`, if present.
    pub async fn cache(&self, name: &str) -> Option<Cache> {
        self.caches
            .read()
            .await
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    /// Writes `caches` to the snapshot file, if one is configured.
    ///
    /// Writes to a sibling temp file and renames it into place so readers
    /// never observe a half-written snapshot.
    async fn persist(&self, caches: &[Cache]) -> Result<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let bytes = serde_json::to_vec(&SnapshotRef { caches })?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Borrowing twin of `Snapshot` for serialization.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    caches: &'a [Cache],
}
