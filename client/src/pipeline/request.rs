//! Pre-dispatch pipeline.

use crate::error::{ClientError, Result};
use crate::http::ApiRequest;
use crate::stores::{LookupShape, NegativeLookupCache, TokenStore};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;
use tracing::debug;

/// Decision taken for a request before it reaches the transport.
#[derive(Debug)]
pub enum PreDispatch {
    /// Send the (decorated) request.
    Dispatch(ApiRequest),

    /// Resolve locally: the identifier is known to be absent.
    ShortCircuit {
        /// The undispatched request
        request: ApiRequest,
        /// Identifier found in the negative-lookup cache
        id: String,
    },
}

/// Decorates outgoing requests and skips known-dead lookups.
#[derive(Debug, Clone)]
pub struct RequestPipeline {
    token_store: TokenStore,
    cache: Arc<NegativeLookupCache>,
    shape: LookupShape,
}

impl RequestPipeline {
    /// Create a request pipeline.
    #[must_use]
    pub const fn new(
        token_store: TokenStore,
        cache: Arc<NegativeLookupCache>,
        shape: LookupShape,
    ) -> Self {
        Self {
            token_store,
            cache,
            shape,
        }
    }

    /// Decide what to do with `request`.
    ///
    /// 1. Lookup-shaped request for a cached identifier: short-circuit.
    /// 2. Otherwise set `Authorization: Bearer <token>` when a token is stored,
    ///    and strip any `Authorization` header when none is.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] if the stored token cannot be
    /// carried in a header.
    pub fn prepare(&self, mut request: ApiRequest) -> Result<PreDispatch> {
        if let Some(id) = self.shape.match_lookup(&request.method, &request.path) {
            if self.cache.has(id) {
                let id = id.to_string();
                return Ok(PreDispatch::ShortCircuit { request, id });
            }
        }

        let session = self.token_store.get();
        match session.token() {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    ClientError::InvalidRequest(
                        "stored token contains characters not allowed in a header".to_string(),
                    )
                })?;
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            None => {
                request.headers.remove(AUTHORIZATION);
            }
        }

        debug!(
            method = %request.method,
            path = %request.path,
            has_token = session.is_authenticated(),
            "API request"
        );

        Ok(PreDispatch::Dispatch(request))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::config::StorageKeys;
    use crate::session::{Role, User};
    use crate::stores::MemoryStorage;

    const PROFILE_ID: &str = "660e8400-e29b-41d4-a716-446655440001";

    fn pipeline() -> (RequestPipeline, TokenStore, Arc<NegativeLookupCache>) {
        let token_store = TokenStore::new(Arc::new(MemoryStorage::new()), StorageKeys::default());
        let cache = Arc::new(NegativeLookupCache::default());
        let pipeline = RequestPipeline::new(
            token_store.clone(),
            Arc::clone(&cache),
            LookupShape::new("/api/profiles"),
        );
        (pipeline, token_store, cache)
    }

    fn dispatched(decision: PreDispatch) -> ApiRequest {
        match decision {
            PreDispatch::Dispatch(request) => request,
            PreDispatch::ShortCircuit { id, .. } => panic!("unexpected short-circuit for {id}"),
        }
    }

    #[test]
    fn test_attaches_stored_token() {
        let (pipeline, token_store, _) = pipeline();
        token_store
            .set("jwt-abc", &User::new("1", "a@alumni.edu", Role::Alumni))
            .unwrap();

        let request = dispatched(pipeline.prepare(ApiRequest::get("/api/jobs")).unwrap());
        assert_eq!(request.bearer_token(), Some("jwt-abc"));
        assert!(request.headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_omits_header_without_token() {
        let (pipeline, _, _) = pipeline();
        let stale = ApiRequest::get("/api/jobs")
            .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));

        let request = dispatched(pipeline.prepare(stale).unwrap());
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_short_circuits_cached_lookup() {
        let (pipeline, _, cache) = pipeline();
        cache.remember(PROFILE_ID);

        let decision = pipeline
            .prepare(ApiRequest::get(format!("/api/profiles/{PROFILE_ID}")))
            .unwrap();

        match decision {
            PreDispatch::ShortCircuit { id, request } => {
                assert_eq!(id, PROFILE_ID);
                assert!(request.headers.get(AUTHORIZATION).is_none());
            }
            PreDispatch::Dispatch(_) => panic!("expected short-circuit"),
        }
    }

    #[test]
    fn test_cached_id_only_suppresses_matching_shape() {
        let (pipeline, _, cache) = pipeline();
        cache.remember(PROFILE_ID);

        let request = ApiRequest::put(format!("/api/profiles/{PROFILE_ID}"));
        assert!(matches!(
            pipeline.prepare(request).unwrap(),
            PreDispatch::Dispatch(_)
        ));

        let request = ApiRequest::get(format!("/api/messages/conversation/{PROFILE_ID}"));
        assert!(matches!(
            pipeline.prepare(request).unwrap(),
            PreDispatch::Dispatch(_)
        ));
    }
}
