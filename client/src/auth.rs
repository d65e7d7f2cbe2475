//! Login and logout.
//!
//! Login goes through the same pipelines as every other call, so a rejected
//! login is classified like any other 401.

use crate::client::SessionClient;
use crate::error::Result;
use crate::providers::Transport;
use crate::session::{Session, User};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Login endpoint.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// Email address.
    pub email: &'a str,
    /// Password.
    pub password: &'a str,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub access_token: String,

    /// Token type; the backend always sends `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Authenticated user.
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl<T: Transport> SessionClient<T> {
    /// Log in and store the resulting session.
    ///
    /// # Errors
    ///
    /// Returns the classified error if the backend rejects the credentials,
    /// [`ClientError::Decode`](crate::ClientError::Decode) for an unexpected
    /// response body, or [`ClientError::Storage`](crate::ClientError::Storage)
    /// if the session cannot be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response: TokenResponse = self
            .post_json(LOGIN_PATH, &LoginRequest { email, password })
            .await?;

        if !response.token_type.eq_ignore_ascii_case("bearer") {
            warn!(token_type = %response.token_type, "Unexpected token type; treating as bearer");
        }

        self.token_store()
            .set(&response.access_token, &response.user)?;

        info!(user_id = %response.user.id, role = %response.user.role, "Logged in");
        Ok(Session::authenticated(response.access_token, response.user))
    }

    /// Drop the stored session. Returns whether one was present.
    pub fn logout(&self) -> bool {
        let had_session = self.token_store().clear();
        if had_session {
            info!("Logged out");
        }
        had_session
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ErrorKind;
    use crate::mocks::MockTransport;
    use crate::providers::HistoryNavigator;
    use crate::session::Role;
    use crate::stores::MemoryStorage;
    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    fn client(location: &str) -> (SessionClient<Arc<MockTransport>>, Arc<MockTransport>, Arc<HistoryNavigator>) {
        let transport = Arc::new(MockTransport::new());
        let navigator = Arc::new(HistoryNavigator::at(location));
        let client = SessionClient::with_transport(
            &ClientConfig::default(),
            Arc::clone(&transport),
            Arc::new(MemoryStorage::new()),
            navigator.clone(),
        )
        .unwrap();
        (client, transport, navigator)
    }

    fn login_body() -> serde_json::Value {
        json!({
            "access_token": "eyJhbGciOiJIUzI1NiJ9.payload.sig",
            "token_type": "bearer",
            "user": {
                "id": "660e8400-e29b-41d4-a716-446655440001",
                "email": "sarah.johnson@alumni.edu",
                "role": "alumni",
                "is_verified": true,
                "is_active": true,
                "created_at": "2024-01-01T00:00:00Z"
            }
        })
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let (client, transport, _) = client("/login");
        transport.push_json(StatusCode::OK, &login_body());

        let session = client
            .login("sarah.johnson@alumni.edu", "password123")
            .await
            .unwrap();

        assert_eq!(session.token(), Some("eyJhbGciOiJIUzI1NiJ9.payload.sig"));
        assert_eq!(session.user().unwrap().role, Role::Alumni);
        assert_eq!(client.session(), session);

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].path, LOGIN_PATH);
        assert_eq!(
            sent[0].body.as_ref().unwrap()["email"],
            "sarah.johnson@alumni.edu"
        );
        assert_eq!(sent[0].bearer_token(), None);
    }

    #[tokio::test]
    async fn test_rejected_login_stays_on_login_page() {
        let (client, transport, navigator) = client("/login");
        transport.push_json(
            StatusCode::UNAUTHORIZED,
            &json!({"detail": "Invalid email or password"}),
        );

        let err = client.login("x@alumni.edu", "wrong").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.to_string(), "Unauthorized: Invalid email or password");
        assert!(!client.session().is_authenticated());
        assert_eq!(navigator.navigation_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (client, transport, _) = client("/dashboard");
        transport.push_json(StatusCode::OK, &login_body());
        client.login("sarah.johnson@alumni.edu", "password123").await.unwrap();

        assert!(client.logout());
        assert!(!client.logout());
        assert_eq!(client.session(), Session::empty());
    }
}
