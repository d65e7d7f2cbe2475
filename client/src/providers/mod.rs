//! Capability traits the session client is built on.
//!
//! Each trait abstracts an external collaborator: persisted key/value storage,
//! navigation, and the HTTP transport. Production implementations live in
//! [`stores`](crate::stores), [`HistoryNavigator`] and
//! [`HttpTransport`](crate::HttpTransport); test doubles live in
//! [`mocks`](crate::mocks).

pub mod navigator;
pub mod storage;
pub mod transport;

pub use navigator::{HistoryNavigator, Navigator};
pub use storage::SessionStorage;
pub use transport::Transport;
