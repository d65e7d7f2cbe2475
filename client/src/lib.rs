//! # alumni-net session client
//!
//! Authenticated HTTP client for the alumni-net REST backend. Every call goes
//! through one [`SessionClient`], which:
//!
//! - attaches `Authorization: Bearer <token>` when a session is stored
//! - short-circuits profile lookups the backend already answered with 404
//! - classifies every outcome exactly once (see [`pipeline::response`])
//! - clears the session and forces re-authentication on 401
//!
//! ## Example
//!
//! ```no_run
//! use alumni_net_client::{ClientConfig, ErrorKind, SessionClient};
//! use alumni_net_client::providers::HistoryNavigator;
//! use alumni_net_client::stores::FileStorage;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let client = SessionClient::new(
//!         &config,
//!         Arc::new(FileStorage::new("session.json")),
//!         Arc::new(HistoryNavigator::at("/directory")),
//!     )?;
//!
//!     client.login("admin@alumni.edu", "password123").await?;
//!
//!     match client
//!         .get_json::<serde_json::Value>("/api/profiles/660e8400-e29b-41d4-a716-446655440001")
//!         .await
//!     {
//!         Ok(profile) => println!("{profile}"),
//!         Err(e) if e.kind() == ErrorKind::ConfirmedAbsent => println!("no profile yet"),
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod http_transport;
pub mod pipeline;
pub mod providers;
pub mod session;
pub mod stores;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use auth::{LOGIN_PATH, LoginRequest, TokenResponse};
pub use client::SessionClient;
pub use config::{ClientConfig, StorageKeys};
pub use error::{ClientError, ConfigError, ErrorKind, Result, StorageError};
pub use http::{ApiRequest, ApiResponse, TransportError};
pub use http_transport::HttpTransport;
pub use pipeline::{Exchange, Outcome, PreDispatch};
pub use session::{Access, Role, Session, User};
pub use stores::{NegativeCachePolicy, NegativeLookupCache, TokenStore};
