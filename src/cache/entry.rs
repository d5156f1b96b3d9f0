//! Cache Entry Module
//!
//! Defines the request key and the stored request/response pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fetch::{normalize_url, FetchRequest, FetchResponse};

// == Request Key ==
/// Identifies a cached response: method plus origin-relative URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub method: String,
    pub url: String,
}

impl RequestKey {
    pub fn new(method: impl AsRef<str>, url: impl AsRef<str>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            url: normalize_url(url.as_ref()),
        }
    }

    /// Key for a GET of `url`, the form manifest resources are stored under.
    pub fn get(url: impl AsRef<str>) -> Self {
        Self::new("GET", url)
    }
}

impl From<&FetchRequest> for RequestKey {
    fn from(request: &FetchRequest) -> Self {
        Self {
            method: request.method.clone(),
            url: request.url.clone(),
        }
    }
}

// == Cache Entry ==
/// A stored request/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The request the response answers
    pub key: RequestKey,
    /// The full stored response
    pub response: FetchResponse,
    /// When the response was stored
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(key: RequestKey, response: FetchResponse) -> Self {
        Self {
            key,
            response,
            cached_at: Utc::now(),
        }
    }

    /// Body size in bytes.
    pub fn size(&self) -> usize {
        self.response.body.len()
    }
}
