//! Worker Registration
//!
//! Drives one worker through install and activate, and decides whether
//! a request is intercepted or goes straight to the network.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use super::lifecycle::{ActivateReport, FetchOutcome, InstallReport, LifecycleHandler, WorkerState};
use crate::error::{Result, WorkerError};
use crate::fetch::{FetchRequest, Fetcher};

// == Registration ==
/// Binds a lifecycle handler to its state and to the network used for
/// requests it does not (yet) control.
pub struct Registration<H> {
    handler: H,
    network: Arc<dyn Fetcher>,
    state: RwLock<WorkerState>,
}

impl<H: LifecycleHandler> Registration<H> {
    pub fn new(handler: H, network: Arc<dyn Fetcher>) -> Self {
        Self {
            handler,
            network,
            state: RwLock::new(WorkerState::Parsed),
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    /// Moves `from` -> `to` atomically, failing if the state is not `from`.
    async fn transition(&self, from: WorkerState, to: WorkerState) -> Result<()> {
        let mut state = self.state.write().await;
        if *state != from {
            return Err(WorkerError::InvalidState(format!(
                "cannot move to {} from {}",
                to, *state
            )));
        }
        *state = to;
        Ok(())
    }

    async fn set_state(&self, to: WorkerState) {
        *self.state.write().await = to;
    }

    // == Install ==
    /// Runs the install handler. On failure the worker becomes redundant.
    pub async fn install(&self) -> Result<InstallReport> {
        self.transition(WorkerState::Parsed, WorkerState::Installing)
            .await?;

        match self.handler.install().await {
            Ok(report) => {
                self.set_state(WorkerState::Installed).await;
                info!("Worker installed");
                Ok(report)
            }
            Err(err) => {
                self.set_state(WorkerState::Redundant).await;
                warn!("Worker install failed, marking redundant: {}", err);
                Err(err)
            }
        }
    }

    // == Activate ==
    /// Runs the activate handler on an installed worker.
    pub async fn activate(&self) -> Result<ActivateReport> {
        self.transition(WorkerState::Installed, WorkerState::Activating)
            .await?;

        match self.handler.activate().await {
            Ok(report) => {
                self.set_state(WorkerState::Activated).await;
                info!(
                    "Worker activated, {} stale cache(s) deleted",
                    report.deleted.len()
                );
                Ok(report)
            }
            Err(err) => {
                self.set_state(WorkerState::Redundant).await;
                warn!("Worker activation failed, marking redundant: {}", err);
                Err(err)
            }
        }
    }

    // == Run Lifecycle ==
    /// Install then activate. Activation is skipped if install fails.
    pub async fn run_lifecycle(&self) -> Result<ActivateReport> {
        self.install().await?;
        self.activate().await
    }

    // == Handle Fetch ==
    /// Routes a request through the worker once it is activated; before
    /// that, or after it became redundant, the network answers directly.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        if self.state().await.can_intercept() {
            self.handler.fetch(request).await
        } else {
            self.network.fetch(request).await.map(FetchOutcome::Network)
        }
    }
}
