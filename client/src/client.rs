//! Session client: the composition root.
//!
//! Wires the token store, negative-lookup cache and navigator into the request
//! and response pipelines around a transport. Application code reaches the
//! backend only through [`SessionClient`].

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::{ApiRequest, ApiResponse};
use crate::http_transport::HttpTransport;
use crate::pipeline::{Exchange, PreDispatch, RequestPipeline, ResponsePipeline};
use crate::providers::{Navigator, SessionStorage, Transport};
use crate::session::Session;
use crate::stores::{LookupShape, NegativeLookupCache, TokenStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Authenticated HTTP session client.
///
/// # Example
///
/// ```no_run
/// use alumni_net_client::{ClientConfig, SessionClient};
/// use alumni_net_client::providers::HistoryNavigator;
/// use alumni_net_client::stores::MemoryStorage;
/// use std::sync::Arc;
///
/// # async fn run() -> alumni_net_client::Result<()> {
/// let config = ClientConfig::from_env()?;
/// let client = SessionClient::new(
///     &config,
///     Arc::new(MemoryStorage::new()),
///     Arc::new(HistoryNavigator::default()),
/// )?;
///
/// client.login("sarah.johnson@alumni.edu", "password123").await?;
/// let _inbox: serde_json::Value = client.get_json("/api/messages/inbox").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionClient<T = HttpTransport> {
    transport: T,
    token_store: TokenStore,
    cache: Arc<NegativeLookupCache>,
    request_pipeline: RequestPipeline,
    response_pipeline: ResponsePipeline,
}

impl SessionClient<HttpTransport> {
    /// Create a client that talks HTTP to `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the configuration is invalid.
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        Self::with_transport(config, transport, storage, navigator)
    }
}

impl<T: Transport> SessionClient<T> {
    /// Create a client over an arbitrary transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the configuration is invalid.
    pub fn with_transport(
        config: &ClientConfig,
        transport: T,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;

        let token_store = TokenStore::new(storage, config.storage_keys.clone());
        let cache = Arc::new(NegativeLookupCache::new(config.negative_cache_policy));
        let shape = LookupShape::new(config.lookup_collection.clone());

        let request_pipeline =
            RequestPipeline::new(token_store.clone(), Arc::clone(&cache), shape.clone());
        let response_pipeline = ResponsePipeline::new(
            token_store.clone(),
            Arc::clone(&cache),
            shape,
            navigator,
            config.login_location.clone(),
        );

        Ok(Self {
            transport,
            token_store,
            cache,
            request_pipeline,
            response_pipeline,
        })
    }

    /// Send a request through both pipelines.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ClientError`] for every non-2xx outcome, a
    /// short-circuited lookup, or a transport failure, and
    /// [`ClientError::InvalidRequest`] for a relative path or one with a
    /// `#fragment`. A `?query` in the path is sent as the URL query.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        if !request.path.starts_with('/') {
            return Err(ClientError::InvalidRequest(format!(
                "path must start with '/': {}",
                request.path
            )));
        }
        if request.path.contains('#') {
            return Err(ClientError::InvalidRequest(format!(
                "path must not carry a fragment: {}",
                request.path
            )));
        }

        match self.request_pipeline.prepare(request)? {
            PreDispatch::ShortCircuit { request, id } => self
                .response_pipeline
                .handle(&request, Exchange::ShortCircuited { id }),
            PreDispatch::Dispatch(request) => {
                let result = self.transport.send(&request).await;
                self.response_pipeline.handle(&request, result.into())
            }
        }
    }

    /// `GET` a path and decode the JSON body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send); also [`ClientError::Decode`] for a bad body.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send); also [`ClientError::Decode`] for a bad body.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(ApiRequest::post(path).with_json(body)?)
            .await?
            .json()
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send); also [`ClientError::Decode`] for a bad body.
    pub async fn put_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(ApiRequest::put(path).with_json(body)?)
            .await?
            .json()
    }

    /// `DELETE` a path.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Current session as held by the token store.
    #[must_use]
    pub fn session(&self) -> Session {
        self.token_store.get()
    }

    /// The token store.
    #[must_use]
    pub const fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    /// The negative-lookup cache.
    #[must_use]
    pub fn negative_cache(&self) -> &NegativeLookupCache {
        &self.cache
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::mocks::MockTransport;
    use crate::providers::HistoryNavigator;
    use crate::stores::MemoryStorage;
    use reqwest::StatusCode;

    fn client() -> SessionClient<MockTransport> {
        SessionClient::with_transport(
            &ClientConfig::default(),
            MockTransport::new(),
            Arc::new(MemoryStorage::new()),
            Arc::new(HistoryNavigator::default()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_relative_path_rejected_without_dispatch() {
        let client = client();
        let err = client.send(ApiRequest::get("api/jobs")).await.unwrap_err();

        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_fragment_rejected_without_dispatch() {
        let client = client();
        let err = client
            .send(ApiRequest::get("/api/forum/posts#latest"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let client = client();
        client
            .transport()
            .push_json(StatusCode::OK, &serde_json::json!({"data": [1, 2, 3]}));

        let body: serde_json::Value = client.get_json("/api/capsules").await.unwrap();
        assert_eq!(body["data"][2], 3);
    }

    #[tokio::test]
    async fn test_decode_failure_is_local() {
        let client = client();
        client.transport().push_status(StatusCode::NO_CONTENT);

        let err = client
            .get_json::<serde_json::Value>("/api/capsules")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Local);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::default().with_login_location("login");
        let result = SessionClient::with_transport(
            &config,
            MockTransport::new(),
            Arc::new(MemoryStorage::new()),
            Arc::new(HistoryNavigator::default()),
        );
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
