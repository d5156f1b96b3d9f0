//! Service Worker Handler
//!
//! Cache-first worker: pre-populates its cache on install, answers fetches
//! from cache before network, and deletes other versions' caches on activate.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{join_all, try_join_all};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::lifecycle::{
    ActivateReport, DeletionFailure, FetchOutcome, InstallReport, LifecycleHandler,
};
use crate::cache::{CacheStorage, InterceptStats, RequestKey};
use crate::config::WorkerConfig;
use crate::error::{Result, WorkerError};
use crate::fetch::{FetchRequest, FetchResponse, Fetcher};

// == Service Worker ==
/// One worker version bound to its configuration, storage and network.
#[derive(Clone)]
pub struct ServiceWorker {
    config: Arc<WorkerConfig>,
    storage: CacheStorage,
    fetcher: Arc<dyn Fetcher>,
    stats: Arc<RwLock<InterceptStats>>,
}

impl ServiceWorker {
    pub fn new(config: WorkerConfig, storage: CacheStorage, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            fetcher,
            stats: Arc::new(RwLock::new(InterceptStats::new())),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Snapshot of the interceptor counters.
    pub async fn stats(&self) -> InterceptStats {
        self.stats.read().await.clone()
    }

    /// Fetches one manifest path, treating non-2xx as failure.
    async fn fetch_for_cache(&self, path: &str) -> Result<(RequestKey, FetchResponse)> {
        let request = FetchRequest::get(path);
        let response = self.fetcher.fetch(&request).await?;
        if !response.is_ok() {
            return Err(WorkerError::Status {
                url: request.url,
                status: response.status,
            });
        }

        Ok((RequestKey::from(&request), response))
    }

    /// Fetches the whole manifest, then commits it in one batch.
    async fn populate(&self) -> Result<usize> {
        let batch = try_join_all(
            self.config
                .manifest
                .iter()
                .map(|path| self.fetch_for_cache(path)),
        )
        .await?;

        self.storage.put_all(&self.config.cache_name, batch).await
    }
}

#[async_trait]
impl LifecycleHandler for ServiceWorker {
    // == Install ==
    async fn install(&self) -> Result<InstallReport> {
        let name = &self.config.cache_name;
        let created = self.storage.open(name).await?;
        info!(
            "Installing cache {} with {} manifest resource(s)",
            name,
            self.config.manifest.len()
        );

        match self.populate().await {
            Ok(stored) => {
                info!("Cache {} populated with {} resource(s)", name, stored);
                Ok(InstallReport {
                    cache_name: name.clone(),
                    stored,
                    created,
                })
            }
            Err(err) => {
                warn!("Install of cache {} failed: {}", name, err);
                // A fresh install leaves nothing behind
                if created {
                    if let Err(e) = self.storage.delete(name).await {
                        warn!("Could not roll back cache {}: {}", name, e);
                    }
                }
                Err(err)
            }
        }
    }

    // == Activate ==
    async fn activate(&self) -> Result<ActivateReport> {
        let current = &self.config.cache_name;
        let names = self.storage.keys().await;
        let retained = names.iter().find(|n| *n == current).cloned();
        let stale: Vec<String> = names.into_iter().filter(|n| n != current).collect();

        if stale.is_empty() {
            debug!("No stale caches to delete");
            return Ok(ActivateReport {
                retained,
                ..ActivateReport::default()
            });
        }

        info!("Deleting {} stale cache(s): {:?}", stale.len(), stale);
        let outcomes = join_all(stale.iter().map(|name| async move {
            (name.clone(), self.storage.delete(name).await)
        }))
        .await;

        let mut report = ActivateReport {
            retained,
            ..ActivateReport::default()
        };
        for (name, outcome) in outcomes {
            match outcome {
                Ok(true) => report.deleted.push(name),
                Ok(false) => debug!("Cache {} already gone", name),
                Err(e) => {
                    warn!("Failed to delete stale cache {}: {}", name, e);
                    report.failed.push(DeletionFailure {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    // == Fetch ==
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        if let Some(response) = self.storage.match_request(request).await {
            self.stats.write().await.record_hit();
            debug!("Cache hit: {} {}", request.method, request.url);
            return Ok(FetchOutcome::Cache(response));
        }

        self.stats.write().await.record_miss();
        debug!("Cache miss: {} {}", request.method, request.url);

        match self.fetcher.fetch(request).await {
            Ok(response) => Ok(FetchOutcome::Network(response)),
            Err(err) => {
                self.stats.write().await.record_network_failure();
                Err(err)
            }
        }
    }
}
