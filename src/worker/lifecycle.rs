//! Worker Lifecycle
//!
//! Lifecycle states, the handler abstraction each worker version implements,
//! and the reports its handlers resolve with.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::fetch::{FetchRequest, FetchResponse};

// == Worker State ==
/// Where a worker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Registered, nothing run yet
    Parsed,
    /// Install handler in flight
    Installing,
    /// Install succeeded, waiting to activate
    Installed,
    /// Activate handler in flight
    Activating,
    /// Controls requests
    Activated,
    /// Failed or replaced; never controls requests
    Redundant,
}

impl WorkerState {
    /// Only an activated worker intercepts fetches.
    pub fn can_intercept(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        f.write_str(s)
    }
}

// == Reports ==
/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Cache that was populated
    pub cache_name: String,
    /// Number of manifest resources stored
    pub stored: usize,
    /// Whether install created the cache rather than refilling it
    pub created: bool,
}

/// A stale cache that could not be deleted during activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub name: String,
    pub error: String,
}

/// Result of an activation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivateReport {
    /// Current cache, if it exists
    pub retained: Option<String>,
    /// Stale caches removed
    pub deleted: Vec<String>,
    /// Stale caches that survived
    pub failed: Vec<DeletionFailure>,
}

impl ActivateReport {
    /// True when every stale cache was removed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

// == Fetch Outcome ==
/// Where an intercepted request was answered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Served from a cache, no network call made
    Cache(FetchResponse),
    /// Served by the network, returned as received
    Network(FetchResponse),
}

impl FetchOutcome {
    pub fn is_cached(&self) -> bool {
        matches!(self, FetchOutcome::Cache(_))
    }

    /// Short label for logs and response headers.
    pub fn source(&self) -> &'static str {
        match self {
            FetchOutcome::Cache(_) => "cache",
            FetchOutcome::Network(_) => "network",
        }
    }

    pub fn response(&self) -> &FetchResponse {
        match self {
            FetchOutcome::Cache(r) | FetchOutcome::Network(r) => r,
        }
    }

    pub fn into_inner(self) -> FetchResponse {
        match self {
            FetchOutcome::Cache(r) | FetchOutcome::Network(r) => r,
        }
    }
}

// == Lifecycle Handler ==
/// The three events a worker version answers.
///
/// Each handler's future resolving is the completion signal: the lifecycle
/// does not advance until it does.
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    /// Prepares the worker's cache. An error leaves the worker redundant.
    async fn install(&self) -> Result<InstallReport>;

    /// Takes control, cleaning up after older versions.
    async fn activate(&self) -> Result<ActivateReport>;

    /// Answers one intercepted request.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome>;
}
