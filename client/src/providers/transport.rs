//! Transport trait.

use crate::http::{ApiRequest, ApiResponse, TransportError};
use std::future::Future;
use std::sync::Arc;

/// Dispatches a prepared request and returns whatever response came back.
///
/// A transport never interprets status codes; any response, including 4xx and
/// 5xx, is `Ok`. `Err` means no response was received (connection failure,
/// timeout).
pub trait Transport: Send + Sync {
    /// Send a request.
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send {
        (**self).send(request)
    }
}
