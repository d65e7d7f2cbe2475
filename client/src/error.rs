//! Error types for the session client.
//!
//! Every call made through [`SessionClient`](crate::SessionClient) resolves to
//! either a successful response or exactly one [`ClientError`] variant. The
//! first group of variants is the response classification taxonomy; the
//! remaining variants describe local failures (configuration, storage,
//! decoding) that never reach the network.

use thiserror::Error;

/// Result type alias for session client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors produced by the session client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    // ═══════════════════════════════════════════════════════════
    // Response classification
    // ═══════════════════════════════════════════════════════════

    /// The backend rejected the session (HTTP 401). The session has been cleared.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("session is invalid or expired"))]
    Unauthorized {
        /// Server-supplied detail, if any
        message: Option<String>,
    },

    /// The backend refused access to the resource (HTTP 403).
    #[error("Forbidden: {}", .message.as_deref().unwrap_or("access denied"))]
    Forbidden {
        /// Server-supplied detail, if any
        message: Option<String>,
    },

    /// A single-resource lookup returned 404; the identifier is now cached as absent.
    #[error("Resource {id} does not exist")]
    ConfirmedAbsent {
        /// Identifier that was looked up
        id: String,
    },

    /// HTTP 404 on a path outside the negative-lookup shape.
    #[error("Not found: {path}")]
    NotFound {
        /// Request path
        path: String,
    },

    /// The backend failed (HTTP 5xx).
    #[error("Server error (status {status}): {}", .message.as_deref().unwrap_or("no detail"))]
    ServerFault {
        /// HTTP status code
        status: u16,
        /// Server-supplied detail, if any
        message: Option<String>,
    },

    /// Any other non-success status (validation errors, conflicts, rate limits).
    #[error("Request rejected (status {status}): {}", .message.as_deref().unwrap_or("no detail"))]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Server-supplied detail, if any
        message: Option<String>,
    },

    /// The request was resolved locally because the identifier is known to be absent.
    #[error("Resource {id} is known to be absent (cached)")]
    KnownAbsent {
        /// Identifier that was looked up
        id: String,
    },

    /// No response was received.
    #[error("Network error: {message}")]
    Network {
        /// Transport error description
        message: String,
        /// Whether the per-request timeout elapsed
        timed_out: bool,
    },

    // ═══════════════════════════════════════════════════════════
    // Local failures
    // ═══════════════════════════════════════════════════════════

    /// Response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request could not be built (bad path, bad header value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Session storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Flat classification of [`ClientError`] for callers that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 401
    Unauthorized,
    /// HTTP 403
    Forbidden,
    /// HTTP 404 on a lookup-shaped path
    ConfirmedAbsent,
    /// HTTP 404 elsewhere
    NotFound,
    /// HTTP 5xx
    ServerFault,
    /// Other non-success status
    Rejected,
    /// Short-circuited lookup
    KnownAbsent,
    /// No response received
    Network,
    /// Local failure (decode, storage, config, invalid request)
    Local,
}

impl ClientError {
    /// Get the flat kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::ConfirmedAbsent { .. } => ErrorKind::ConfirmedAbsent,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ServerFault { .. } => ErrorKind::ServerFault,
            Self::Rejected { .. } => ErrorKind::Rejected,
            Self::KnownAbsent { .. } => ErrorKind::KnownAbsent,
            Self::Network { .. } => ErrorKind::Network,
            Self::Decode(_) | Self::InvalidRequest(_) | Self::Storage(_) | Self::Config(_) => {
                ErrorKind::Local
            }
        }
    }

    /// HTTP status associated with this error, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::ConfirmedAbsent { .. } | Self::NotFound { .. } => Some(404),
            Self::ServerFault { status, .. } | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the resource is known not to exist (fresh 404 or cached).
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(
            self,
            Self::ConfirmedAbsent { .. } | Self::KnownAbsent { .. } | Self::NotFound { .. }
        )
    }
}

/// Errors raised by session storage backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("Storage I/O failed: {0}")]
    Io(String),

    /// Stored data could not be (de)serialized.
    #[error("Stored data is malformed: {0}")]
    Malformed(String),
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable holds an unusable value.
    #[error("Invalid value for {var}: {reason}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}
