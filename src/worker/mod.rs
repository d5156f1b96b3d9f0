//! Worker Module
//!
//! The cache-first service worker and the registration that runs its
//! install/activate lifecycle.
//!
//! # Lifecycle
//! - Install: pre-fetch the manifest into the current cache, all or nothing
//! - Activate: delete every cache not named for the current version
//! - Fetch: answer from any cache first, otherwise from the network

mod handler;
mod lifecycle;
mod registration;


pub use handler::ServiceWorker;
pub use lifecycle::{
    ActivateReport, DeletionFailure, FetchOutcome, InstallReport, LifecycleHandler, WorkerState,
};
pub use registration::Registration;
