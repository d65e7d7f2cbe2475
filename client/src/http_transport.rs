//! `reqwest`-backed transport.

use crate::config::ClientConfig;
use crate::error::{ConfigError, Result};
use crate::http::{ApiRequest, ApiResponse, TransportError};
use crate::providers::Transport;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Url};

/// HTTP transport that sends requests to the backend base URL.
///
/// Every request carries `Content-Type: application/json` and is failed by
/// the client after the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the underlying HTTP client cannot
    /// be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Validation(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request path against the base URL, keeping any base path prefix.
    ///
    /// A `?query` suffix on `path` becomes the URL query; pairs from
    /// [`ApiRequest::query`] are appended to it when the request is built.
    fn url_for(&self, path: &str) -> Url {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{path}"));
        if query.is_some() {
            url.set_query(query);
        }
        url
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url_for(&request.path))
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_paths() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        assert_eq!(
            transport.url_for("/api/jobs").as_str(),
            "http://localhost:8001/api/jobs"
        );
    }

    #[test]
    fn test_url_for_keeps_inline_query() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        assert_eq!(
            transport.url_for("/api/jobs?page=2&type=full-time").as_str(),
            "http://localhost:8001/api/jobs?page=2&type=full-time"
        );
    }

    #[test]
    fn test_url_for_keeps_base_prefix() {
        let config = ClientConfig::new(Url::parse("https://alumni.example.edu/backend/").unwrap());
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.base_url().path(), "/backend/");
        assert_eq!(
            transport.url_for("/api/profiles/me").as_str(),
            "https://alumni.example.edu/backend/api/profiles/me"
        );
    }
}
