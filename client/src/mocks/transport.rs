//! Mock transport for testing.

use crate::http::{ApiRequest, ApiResponse, TransportError};
use crate::providers::Transport;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Mock transport.
///
/// Replays queued results in order and records every request it receives.
/// An empty queue yields a transport error.
#[derive(Debug, Default)]
pub struct MockTransport {
    queue: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Create a mock transport with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn push_response(&self, response: ApiResponse) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(response));
    }

    /// Queue a response with an empty body.
    pub fn push_status(&self, status: StatusCode) {
        self.push_response(ApiResponse::new(status));
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: StatusCode, body: &serde_json::Value) {
        self.push_response(ApiResponse::json_body(status, body));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no mock response queued")))
    }
}
