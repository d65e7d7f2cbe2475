//! Session client configuration.
//!
//! Values are supplied by the application; [`ClientConfig::from_env`] reads the
//! backend address from `ALUMNI_BACKEND_URL` and falls back to a local default.

use crate::error::ConfigError;
use crate::stores::NegativeCachePolicy;
use reqwest::Url;
use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_ENV: &str = "ALUMNI_BACKEND_URL";

/// Environment variable overriding the per-request timeout, in seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "ALUMNI_REQUEST_TIMEOUT_SECS";

/// Backend address used when `ALUMNI_BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

/// Default per-request ceiling.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default login location used for forced re-authentication.
pub const DEFAULT_LOGIN_LOCATION: &str = "/login";

/// Default collection root whose single-resource lookups are negatively cached.
pub const DEFAULT_LOOKUP_COLLECTION: &str = "/api/profiles";

/// Storage keys for the persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Key holding the bearer token.
    pub token: String,

    /// Key holding the serialized user record.
    pub user: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            token: "token".to_string(),
            user: "user".to_string(),
        }
    }
}

/// Session client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:8001").
    ///
    /// Request paths are joined onto this URL.
    pub base_url: Url,

    /// Per-request ceiling after which the transport fails the call.
    ///
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// Location navigated to when the session is invalidated.
    ///
    /// Default: `/login`
    pub login_location: String,

    /// Collection root for negatively cached lookups.
    ///
    /// Default: `/api/profiles`
    pub lookup_collection: String,

    /// Expiry policy for negatively cached identifiers.
    ///
    /// Default: permanent for the process lifetime
    pub negative_cache_policy: NegativeCachePolicy,

    /// Keys used in session storage.
    pub storage_keys: StorageKeys,
}

impl ClientConfig {
    /// Create configuration for the given backend URL with defaults elsewhere.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            login_location: DEFAULT_LOGIN_LOCATION.to_string(),
            lookup_collection: DEFAULT_LOOKUP_COLLECTION.to_string(),
            negative_cache_policy: NegativeCachePolicy::Permanent,
            storage_keys: StorageKeys::default(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `ALUMNI_BACKEND_URL` is not a valid
    /// URL or `ALUMNI_REQUEST_TIMEOUT_SECS` is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from variables resolved by `lookup`.
    ///
    /// Same rules as [`from_env`](Self::from_env).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for an unparseable value and
    /// [`ConfigError::Validation`] for a zero timeout.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup(BACKEND_URL_ENV).unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let base_url = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidEnv {
            var: BACKEND_URL_ENV,
            reason: e.to_string(),
        })?;

        let mut config = Self::new(base_url);

        if let Some(raw_timeout) = lookup(REQUEST_TIMEOUT_ENV) {
            let secs: u64 = raw_timeout.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: REQUEST_TIMEOUT_ENV,
                reason: format!("expected whole seconds, got {raw_timeout:?}"),
            })?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the login location.
    #[must_use]
    pub fn with_login_location(mut self, location: impl Into<String>) -> Self {
        self.login_location = location.into();
        self
    }

    /// Set the collection root for negatively cached lookups.
    #[must_use]
    pub fn with_lookup_collection(mut self, collection: impl Into<String>) -> Self {
        self.lookup_collection = collection.into();
        self
    }

    /// Set the negative cache expiry policy.
    #[must_use]
    pub const fn with_negative_cache_policy(mut self, policy: NegativeCachePolicy) -> Self {
        self.negative_cache_policy = policy;
        self
    }

    /// Set the session storage keys.
    #[must_use]
    pub fn with_storage_keys(mut self, keys: StorageKeys) -> Self {
        self.storage_keys = keys;
        self
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the timeout is zero, the base URL
    /// cannot carry paths, or a location/collection is not an absolute path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "request_timeout must be > 0".to_string(),
            ));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::Validation(format!(
                "base_url {} cannot be used as a base",
                self.base_url
            )));
        }
        if !self.login_location.starts_with('/') {
            return Err(ConfigError::Validation(
                "login_location must be an absolute path".to_string(),
            ));
        }
        if !self.lookup_collection.starts_with('/') || self.lookup_collection.ends_with('/') {
            return Err(ConfigError::Validation(
                "lookup_collection must be an absolute path without a trailing slash".to_string(),
            ));
        }
        if self.storage_keys.token == self.storage_keys.user {
            return Err(ConfigError::Validation(
                "token and user storage keys must differ".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base_url = Url::parse(DEFAULT_BACKEND_URL)
            .unwrap_or_else(|_| unreachable!("default backend URL is valid"));
        Self::new(base_url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:8001/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.login_location, "/login");
        assert_eq!(config.lookup_collection, "/api/profiles");
        assert_eq!(config.negative_cache_policy, NegativeCachePolicy::Permanent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::new(Url::parse("https://alumni.example.edu").unwrap())
            .with_request_timeout(Duration::from_secs(5))
            .with_login_location("/auth/login")
            .with_lookup_collection("/api/users")
            .with_negative_cache_policy(NegativeCachePolicy::Ttl(Duration::from_secs(60)));

        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.login_location, "/auth/login");
        assert_eq!(config.lookup_collection, "/api/users");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = ClientConfig::default().with_request_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = ClientConfig::default().with_login_location("login");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = ClientConfig::default().with_lookup_collection("/api/profiles/");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = ClientConfig::default().with_storage_keys(StorageKeys {
            token: "same".to_string(),
            user: "same".to_string(),
        });
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| pairs.iter().find(|(k, _)| k.as_str() == var).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_lookup_falls_back_to_local_backend() {
        let config = ClientConfig::from_lookup(vars(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8001/");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_lookup_reads_backend_and_timeout() {
        let config = ClientConfig::from_lookup(vars(&[
            (BACKEND_URL_ENV, "https://api.alumni.example.edu"),
            (REQUEST_TIMEOUT_ENV, " 5 "),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://api.alumni.example.edu/");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_lookup_rejects_invalid_backend_url() {
        let err = ClientConfig::from_lookup(vars(&[(BACKEND_URL_ENV, "not a url")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: BACKEND_URL_ENV,
                ..
            }
        ));
    }

    #[test]
    fn test_lookup_rejects_bad_timeouts() {
        let err =
            ClientConfig::from_lookup(vars(&[(REQUEST_TIMEOUT_ENV, "thirty")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: REQUEST_TIMEOUT_ENV,
                ..
            }
        ));

        let err = ClientConfig::from_lookup(vars(&[(REQUEST_TIMEOUT_ENV, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
