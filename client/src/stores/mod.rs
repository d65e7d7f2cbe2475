//! Session state stores.
//!
//! - [`TokenStore`]: the persisted bearer token and user record
//! - [`NegativeLookupCache`]: identifiers confirmed absent by the backend
//! - [`MemoryStorage`] / [`FileStorage`]: [`SessionStorage`](crate::providers::SessionStorage)
//!   backends

pub mod file;
pub mod memory;
pub mod negative_cache;
pub mod token_store;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use negative_cache::{LookupShape, NegativeCachePolicy, NegativeLookupCache};
pub use token_store::TokenStore;
