//! Cache Store Module
//!
//! A single named cache: request/response pairs in insertion order.

use serde::{Deserialize, Serialize};

use crate::cache::{CacheEntry, RequestKey};
use crate::fetch::FetchResponse;

// == Cache ==
/// One named cache. No expiry, no eviction; entries live until the whole
/// cache is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cache {
    /// Cache name (the version identifier)
    name: String,
    /// Stored pairs, oldest first
    entries: Vec<CacheEntry>,
}

impl Cache {
    // == Constructor ==
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Put ==
    /// Stores `response` under `key`, replacing an existing entry in place.
    pub fn put(&mut self, key: RequestKey, response: FetchResponse) {
        let entry = CacheEntry::new(key, response);
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    // == Put All ==
    /// Stores a batch of pairs.
    pub fn put_all(&mut self, batch: impl IntoIterator<Item = (RequestKey, FetchResponse)>) {
        for (key, response) in batch {
            self.put(key, response);
        }
    }

    // == Match ==
    /// Returns the response stored for `key`, if any.
    pub fn match_key(&self, key: &RequestKey) -> Option<&FetchResponse> {
        self.entries
            .iter()
            .find(|e| &e.key == key)
            .map(|e| &e.response)
    }

    // == Keys ==
    /// Stored request keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &RequestKey> {
        self.entries.iter().map(|e| &e.key)
    }

    /// Total size of stored bodies in bytes.
    pub fn size(&self) -> usize {
        self.entries.iter().map(CacheEntry::size).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
