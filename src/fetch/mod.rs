//! Fetch Module
//!
//! Request/response values exchanged with the network, and the `Fetcher`
//! seam the worker uses to reach it.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpFetcher;
pub(crate) use http::is_hop_by_hop;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// == Fetch Request ==
/// An outgoing request as seen by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Upper-cased HTTP method
    pub method: String,
    /// Origin-relative URL (path plus query, no fragment)
    pub url: String,
    /// Request headers in arrival order
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Vec<u8>,
}

impl FetchRequest {
    pub fn new(method: impl AsRef<str>, url: impl AsRef<str>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            url: normalize_url(url.as_ref()),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Shorthand for a bodiless GET.
    pub fn get(url: impl AsRef<str>) -> Self {
        Self::new("GET", url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

// == Fetch Response ==
/// A full response: status, headers and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// True for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// == Fetcher ==
/// Performs real network fetches on behalf of the worker.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `request` from the network, returning whatever the network
    /// answered. Non-2xx statuses are responses, not errors.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

/// Reduces a URL to the origin-relative form used as a cache key:
/// path plus query, fragment removed, exactly one leading slash.
///
/// A run of leading slashes or backslashes collapses to one, so the result
/// can never be read as a scheme-relative URL naming another host.
pub fn normalize_url(raw: &str) -> String {
    if let Ok(parsed) = url::Url::parse(raw) {
        if parsed.has_host() {
            let path = single_leading_slash(parsed.path());
            return match parsed.query() {
                Some(q) => format!("{}?{}", path, q),
                None => path,
            };
        }
    }

    let without_fragment = raw.split('#').next().unwrap_or_default();
    single_leading_slash(without_fragment)
}

fn single_leading_slash(path: &str) -> String {
    format!("/{}", path.trim_start_matches(['/', '\\']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_method_is_uppercased() {
        let req = FetchRequest::new("post", "/api/apply");
        assert_eq!(req.method, "POST");
    }

    #[test]
    fn test_normalize_relative_paths() {
        assert_eq!(normalize_url("/"), "/");
        assert_eq!(normalize_url("about"), "/about");
        assert_eq!(normalize_url("/apply#form"), "/apply");
        assert_eq!(normalize_url("/apply?ref=home#top"), "/apply?ref=home");
    }

    #[test]
    fn test_normalize_absolute_url() {
        assert_eq!(
            normalize_url("https://example.com/assets/utils.js?v=2#x"),
            "/assets/utils.js?v=2"
        );
        assert_eq!(normalize_url("http://localhost:8080"), "/");
    }

    #[test]
    fn test_normalize_collapses_leading_slashes() {
        assert_eq!(normalize_url("//evil.example/steal"), "/evil.example/steal");
        assert_eq!(normalize_url("///a//b"), "/a//b");
        assert_eq!(normalize_url("/\\evil.example"), "/evil.example");
        assert_eq!(
            normalize_url("http://localhost:8080//evil.example/x?y=1"),
            "/evil.example/x?y=1"
        );
    }

    #[test]
    fn test_response_is_ok() {
        assert!(FetchResponse::new(200, "ok").is_ok());
        assert!(FetchResponse::new(204, "").is_ok());
        assert!(!FetchResponse::new(304, "").is_ok());
        assert!(!FetchResponse::new(500, "").is_ok());
    }

    #[test]
    fn test_response_header_lookup_ignores_case() {
        let resp = FetchResponse::new(200, "{}").with_header("Content-Type", "application/json");
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("etag"), None);
    }
}
