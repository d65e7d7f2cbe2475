//! Mock implementations for testing.
//!
//! In-memory test doubles for the transport and session storage. Navigation
//! needs no mock: [`HistoryNavigator`](crate::providers::HistoryNavigator)
//! already records every navigation.

pub mod storage;
pub mod transport;

pub use storage::MockStorage;
pub use transport::MockTransport;
