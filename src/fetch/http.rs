//! HTTP Fetcher
//!
//! `Fetcher` backed by reqwest, resolving origin-relative request URLs
//! against an upstream base URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use super::{FetchRequest, FetchResponse, Fetcher};
use crate::error::{Result, WorkerError};

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// Returns true if `name` should be dropped when relaying a message.
pub(crate) fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| h.eq_ignore_ascii_case(name))
}

// == HTTP Fetcher ==
/// Network fetcher talking to one upstream origin.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    /// Creates a fetcher for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| WorkerError::InvalidRequest(format!("bad upstream url {}: {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WorkerError::Internal(e.to_string()))?;

        Ok(Self { client, base })
    }

    /// The upstream origin requests are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Shared reqwest client, reused for auxiliary upstream calls.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolves `url` against the base. Targets outside the upstream origin
    /// are rejected.
    fn resolve(&self, url: &str) -> Result<Url> {
        let target = self
            .base
            .join(url)
            .map_err(|e| WorkerError::InvalidRequest(format!("cannot resolve {}: {}", url, e)))?;
        if target.origin() != self.base.origin() {
            return Err(WorkerError::InvalidRequest(format!(
                "{} resolves outside the upstream origin",
                url
            )));
        }

        Ok(target)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let target = self.resolve(&request.url)?;
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| WorkerError::InvalidRequest(format!("bad method {}", request.method)))?;

        debug!("Network fetch: {} {}", method, target);

        let mut builder = self.client.request(method, target);
        for (name, value) in &request.headers {
            if !is_hop_by_hop(name) {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| WorkerError::fetch(&request.url, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| WorkerError::fetch(&request.url, e))?
            .to_vec();

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = HttpFetcher::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(WorkerError::InvalidRequest(_))));
    }

    #[test]
    fn test_resolve_against_base() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:8080", Duration::from_secs(1)).unwrap();
        let url = fetcher.resolve("/assets/utils.js?v=1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/assets/utils.js?v=1");
    }

    #[test]
    fn test_resolve_rejects_foreign_origin() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:8080", Duration::from_secs(1)).unwrap();
        for raw in ["//evil.example/steal", "https://evil.example/", "http://127.0.0.1:9090/"] {
            assert!(
                matches!(fetcher.resolve(raw), Err(WorkerError::InvalidRequest(_))),
                "{} was not rejected",
                raw
            );
        }
    }

    #[test]
    fn test_scheme_relative_request_stays_on_upstream() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:8080", Duration::from_secs(1)).unwrap();
        let request = FetchRequest::get("//evil.example/steal");

        let target = fetcher.resolve(&request.url).unwrap();

        assert_eq!(target.host_str(), Some("127.0.0.1"));
        assert_eq!(target.as_str(), "http://127.0.0.1:8080/evil.example/steal");
    }

    #[tokio::test]
    async fn test_fetch_to_foreign_origin_never_leaves() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let request = FetchRequest {
            url: "//evil.example/steal".to_string(),
            ..FetchRequest::get("/")
        };

        let result = fetcher.fetch(&request).await;

        assert!(matches!(result, Err(WorkerError::InvalidRequest(_))));
    }

    #[test]
    fn test_hop_by_hop_headers() {
        assert!(is_hop_by_hop("Connection"));
        assert!(is_hop_by_hop("host"));
        assert!(!is_hop_by_hop("content-type"));
        assert!(!is_hop_by_hop("cookie"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_fetch_error() {
        // Port 9 (discard) is not expected to accept HTTP connections locally
        let fetcher = HttpFetcher::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = fetcher.fetch(&FetchRequest::get("/")).await;
        assert!(matches!(result, Err(WorkerError::Fetch { .. })));
    }
}
