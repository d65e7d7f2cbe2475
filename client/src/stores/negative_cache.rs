//! Negative-lookup cache.
//!
//! Remembers identifiers the backend confirmed absent so repeat lookups can be
//! resolved without a network round trip. Only requests matching a
//! [`LookupShape`] (`GET <collection>/<uuid>`) take part.

use reqwest::Method;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Length of a canonical hyphenated UUID.
const RESOURCE_ID_LEN: usize = 36;

/// Expiry policy for negatively cached identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeCachePolicy {
    /// Entries live until the process exits (or [`NegativeLookupCache::clear`]).
    #[default]
    Permanent,

    /// Entries expire after the given duration.
    Ttl(Duration),
}

/// Request shape eligible for negative caching: `GET <collection>/<id>`.
///
/// `<id>` must be a canonical hyphenated UUID in lowercase hex. Anything else
/// (numeric ids, slugs, nested paths, other methods) never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupShape {
    collection: String,
}

impl LookupShape {
    /// Create a shape for the given collection root (e.g. `/api/profiles`).
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    /// Collection root.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Extract the resource identifier if `method`/`path` match this shape.
    #[must_use]
    pub fn match_lookup<'a>(&self, method: &Method, path: &'a str) -> Option<&'a str> {
        if *method != Method::GET {
            return None;
        }

        let id = path
            .strip_prefix(self.collection.as_str())?
            .strip_prefix('/')?;

        is_resource_id(id).then_some(id)
    }
}

fn is_resource_id(candidate: &str) -> bool {
    candidate.len() == RESOURCE_ID_LEN
        && candidate
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f' | b'-'))
        && Uuid::try_parse(candidate).is_ok()
}

/// In-memory set of identifiers confirmed absent.
#[derive(Debug, Default)]
pub struct NegativeLookupCache {
    policy: NegativeCachePolicy,
    // id -> instant the absence was confirmed
    entries: RwLock<HashMap<String, Instant>>,
}

impl NegativeLookupCache {
    /// Create an empty cache with the given policy.
    #[must_use]
    pub fn new(policy: NegativeCachePolicy) -> Self {
        Self {
            policy,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Expiry policy.
    #[must_use]
    pub const fn policy(&self) -> NegativeCachePolicy {
        self.policy
    }

    /// Whether `id` is known to be absent.
    ///
    /// Expired entries are evicted on read.
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        let expired = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            let Some(confirmed_at) = entries.get(id) else {
                return false;
            };
            self.is_expired(*confirmed_at)
        };

        if expired {
            self.forget(id);
        }
        !expired
    }

    /// Record that `id` is absent. Repeating the call only refreshes the entry.
    pub fn remember(&self, id: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), Instant::now());
    }

    /// Drop a single entry (e.g. after the caller created the resource).
    pub fn forget(&self, id: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of entries, including any not yet evicted after expiry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, confirmed_at: Instant) -> bool {
        match self.policy {
            NegativeCachePolicy::Permanent => false,
            NegativeCachePolicy::Ttl(ttl) => confirmed_at.elapsed() >= ttl,
        }
    }
}
