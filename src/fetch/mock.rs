//! In-memory fetcher for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FetchRequest, FetchResponse, Fetcher};
use crate::error::{Result, WorkerError};

/// Serves canned responses by URL and counts every call.
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: HashMap<String, FetchResponse>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `url` with a 200 whose body is `body`.
    pub fn route(mut self, url: &str, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), FetchResponse::new(200, body.as_bytes()));
        self
    }

    pub fn route_response(mut self, url: &str, response: FetchResponse) -> Self {
        self.routes.insert(url.to_string(), response);
        self
    }

    /// Answers every manifest path with a body naming the path.
    pub fn serving(paths: &[String]) -> Self {
        paths
            .iter()
            .fold(Self::new(), |m, p| m.route(p, &format!("body of {}", p)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.url.clone());
        self.routes
            .get(&request.url)
            .cloned()
            .ok_or_else(|| WorkerError::fetch(&request.url, "network unreachable"))
    }
}
