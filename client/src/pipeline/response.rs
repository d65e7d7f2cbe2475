//! Post-dispatch pipeline.
//!
//! Classifies each exchange into exactly one [`Outcome`] and applies its
//! policy:
//!
//! | Outcome | Condition | Action |
//! |---|---|---|
//! | `Success` | 2xx | pass through |
//! | `Unauthorized` | 401 | clear session, navigate to login unless there |
//! | `Forbidden` | 403 | propagate |
//! | `ConfirmedAbsent` | 404 on a lookup-shaped path | remember id, propagate |
//! | `NotFound` | 404 elsewhere | propagate |
//! | `ServerFault` | ≥ 500 | propagate |
//! | `Rejected` | any other status | propagate |
//! | `KnownAbsent` | short-circuited before dispatch | propagate, not logged |
//! | `NetworkFailure` | no response | propagate |

use crate::error::{ClientError, Result};
use crate::http::{ApiRequest, ApiResponse, TransportError};
use crate::providers::Navigator;
use crate::stores::{LookupShape, NegativeLookupCache, TokenStore};
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// What came back for a request.
#[derive(Debug)]
pub enum Exchange {
    /// A response was received (any status).
    Received(ApiResponse),

    /// No response was received.
    Failed(TransportError),

    /// The request was never dispatched: the id is known to be absent.
    ShortCircuited {
        /// Identifier found in the negative-lookup cache
        id: String,
    },
}

impl From<std::result::Result<ApiResponse, TransportError>> for Exchange {
    fn from(result: std::result::Result<ApiResponse, TransportError>) -> Self {
        match result {
            Ok(response) => Self::Received(response),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Classification of an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// HTTP 2xx.
    Success,
    /// HTTP 401.
    Unauthorized,
    /// HTTP 403.
    Forbidden,
    /// HTTP 404 on a lookup-shaped path.
    ConfirmedAbsent {
        /// Identifier that was looked up
        id: String,
    },
    /// HTTP 404 on any other path.
    NotFound,
    /// HTTP 5xx.
    ServerFault,
    /// Any other status.
    Rejected,
    /// Short-circuited before dispatch.
    KnownAbsent {
        /// Identifier found in the negative-lookup cache
        id: String,
    },
    /// No response received.
    NetworkFailure,
}

/// Classifies exchanges and applies session policy.
#[derive(Clone)]
pub struct ResponsePipeline {
    token_store: TokenStore,
    cache: Arc<NegativeLookupCache>,
    shape: LookupShape,
    navigator: Arc<dyn Navigator>,
    login_location: String,
}

impl std::fmt::Debug for ResponsePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponsePipeline")
            .field("shape", &self.shape)
            .field("login_location", &self.login_location)
            .finish_non_exhaustive()
    }
}

impl ResponsePipeline {
    /// Create a response pipeline.
    #[must_use]
    pub fn new(
        token_store: TokenStore,
        cache: Arc<NegativeLookupCache>,
        shape: LookupShape,
        navigator: Arc<dyn Navigator>,
        login_location: impl Into<String>,
    ) -> Self {
        Self {
            token_store,
            cache,
            shape,
            navigator,
            login_location: login_location.into(),
        }
    }

    /// Classify an exchange without side effects.
    #[must_use]
    pub fn classify(&self, method: &Method, path: &str, exchange: &Exchange) -> Outcome {
        match exchange {
            Exchange::ShortCircuited { id } => Outcome::KnownAbsent { id: id.clone() },
            Exchange::Failed(_) => Outcome::NetworkFailure,
            Exchange::Received(response) => {
                self.classify_status(method, path, response.status).into()
            }
        }
    }

    fn classify_status(&self, method: &Method, path: &str, status: StatusCode) -> StatusClass {
        if status.is_success() {
            return StatusClass::Success;
        }

        match status {
            StatusCode::UNAUTHORIZED => StatusClass::Unauthorized,
            StatusCode::FORBIDDEN => StatusClass::Forbidden,
            StatusCode::NOT_FOUND => match self.shape.match_lookup(method, path) {
                Some(id) => StatusClass::ConfirmedAbsent { id: id.to_string() },
                None => StatusClass::NotFound,
            },
            s if s.as_u16() >= 500 => StatusClass::ServerFault,
            _ => StatusClass::Rejected,
        }
    }

    /// Classify the exchange for `request`, apply its policy, and resolve the call.
    ///
    /// # Errors
    ///
    /// Returns the [`ClientError`] matching the outcome for every outcome
    /// except `Success`.
    pub fn handle(&self, request: &ApiRequest, exchange: Exchange) -> Result<ApiResponse> {
        match exchange {
            // Previously confirmed absent: not logged.
            Exchange::ShortCircuited { id } => Err(ClientError::KnownAbsent { id }),
            Exchange::Failed(err) => {
                error!(
                    method = %request.method,
                    path = %request.path,
                    timed_out = err.timed_out,
                    error = %err,
                    "Network error: no response from server"
                );
                Err(ClientError::Network {
                    message: err.message,
                    timed_out: err.timed_out,
                })
            }
            Exchange::Received(response) => self.resolve(request, response),
        }
    }

    fn resolve(&self, request: &ApiRequest, response: ApiResponse) -> Result<ApiResponse> {
        let status = response.status.as_u16();
        match self.classify_status(&request.method, &request.path, response.status) {
            StatusClass::Success => {
                debug!(method = %request.method, path = %request.path, status, "API response");
                Ok(response)
            }
            StatusClass::Unauthorized => {
                warn!(
                    method = %request.method,
                    path = %request.path,
                    had_token = request.bearer_token().is_some(),
                    "Unauthorized response; clearing session"
                );
                self.invalidate_session();
                Err(ClientError::Unauthorized {
                    message: response.error_message(),
                })
            }
            StatusClass::Forbidden => {
                warn!(method = %request.method, path = %request.path, "Forbidden: access denied");
                Err(ClientError::Forbidden {
                    message: response.error_message(),
                })
            }
            StatusClass::ConfirmedAbsent { id } => {
                debug!(id = %id, "Lookup confirmed absent; caching");
                self.cache.remember(&id);
                Err(ClientError::ConfirmedAbsent { id })
            }
            StatusClass::NotFound => {
                debug!(method = %request.method, path = %request.path, "Not found");
                Err(ClientError::NotFound {
                    path: request.path.clone(),
                })
            }
            StatusClass::ServerFault => {
                error!(method = %request.method, path = %request.path, status, "Server error");
                Err(ClientError::ServerFault {
                    status,
                    message: response.error_message(),
                })
            }
            StatusClass::Rejected => {
                debug!(method = %request.method, path = %request.path, status, "Request rejected");
                Err(ClientError::Rejected {
                    status,
                    message: response.error_message(),
                })
            }
        }
    }

    // Any 401 ends whatever session is stored, even one created after the
    // failing request was dispatched with an older token.
    fn invalidate_session(&self) {
        self.token_store.clear();

        if self.navigator.current_location() != self.login_location {
            self.navigator.navigate_to(&self.login_location);
        }
    }
}

/// Classification of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusClass {
    Success,
    Unauthorized,
    Forbidden,
    ConfirmedAbsent { id: String },
    NotFound,
    ServerFault,
    Rejected,
}

impl From<StatusClass> for Outcome {
    fn from(class: StatusClass) -> Self {
        match class {
            StatusClass::Success => Self::Success,
            StatusClass::Unauthorized => Self::Unauthorized,
            StatusClass::Forbidden => Self::Forbidden,
            StatusClass::ConfirmedAbsent { id } => Self::ConfirmedAbsent { id },
            StatusClass::NotFound => Self::NotFound,
            StatusClass::ServerFault => Self::ServerFault,
            StatusClass::Rejected => Self::Rejected,
        }
    }
}
