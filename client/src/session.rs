//! Session and user types.
//!
//! A [`Session`] pairs the bearer token with the last-known user record. The
//! user is only meaningful while a token is present.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Current student.
    Student,
    /// Graduate of the institution.
    Alumni,
    /// Employer posting jobs.
    Recruiter,
    /// Platform administrator.
    Admin,
    /// Role string this client does not recognise.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Alumni => write!(f, "alumni"),
            Self::Recruiter => write!(f, "recruiter"),
            Self::Admin => write!(f, "admin"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Authenticated user record as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: String,

    /// Email address.
    pub email: String,

    /// Role.
    pub role: Role,

    /// Display name, when the backend sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether the email address has been verified.
    #[serde(default)]
    pub is_verified: bool,

    /// Whether the account is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl User {
    /// Create a user record with the required fields.
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
            name: None,
            is_verified: false,
            is_active: true,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Bearer token plus the user it authenticates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Opaque bearer credential.
    pub token: Option<String>,

    /// Last-known authenticated user.
    pub user: Option<User>,
}

/// Outcome of a role check against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<'a> {
    /// The session is authenticated and the role is allowed.
    Granted(&'a User),

    /// No authenticated user; the caller should send the user to the login location.
    LoginRequired,

    /// Authenticated, but the role is not in the allow-list.
    Denied {
        /// Role of the current user
        role: Role,
    },
}

impl Session {
    /// An empty (logged-out) session.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            token: None,
            user: None,
        }
    }

    /// Create an authenticated session.
    #[must_use]
    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Whether a bearer token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The user, if the session is authenticated.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        if self.is_authenticated() {
            self.user.as_ref()
        } else {
            None
        }
    }

    /// Check the session against a role allow-list.
    ///
    /// An empty allow-list admits any authenticated user.
    #[must_use]
    pub fn authorize(&self, allowed: &[Role]) -> Access<'_> {
        let Some(user) = self.user() else {
            return Access::LoginRequired;
        };

        if allowed.is_empty() || allowed.contains(&user.role) {
            Access::Granted(user)
        } else {
            Access::Denied { role: user.role }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    fn alumni() -> User {
        User::new(
            "660e8400-e29b-41d4-a716-446655440001",
            "sarah.johnson@alumni.edu",
            Role::Alumni,
        )
    }

    #[test]
    fn test_user_deserializes_backend_payload() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "email": "admin@alumni.edu",
            "role": "admin",
            "is_verified": true,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z"
        });

        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_verified);
        assert!(user.name.is_none());
    }

    #[test]
    fn test_unknown_role_is_tolerated() {
        let json = serde_json::json!({
            "id": "1",
            "email": "x@example.com",
            "role": "moderator"
        });

        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert!(user.is_active);
    }

    #[test]
    fn test_user_without_token_is_not_meaningful() {
        let session = Session {
            token: None,
            user: Some(alumni()),
        };
        assert!(session.user().is_none());
        assert_eq!(session.authorize(&[]), Access::LoginRequired);
    }

    #[test]
    fn test_authorize() {
        let session = Session::authenticated("tok", alumni());

        assert!(matches!(session.authorize(&[]), Access::Granted(_)));
        assert!(matches!(
            session.authorize(&[Role::Alumni, Role::Admin]),
            Access::Granted(u) if u.email == "sarah.johnson@alumni.edu"
        ));
        assert_eq!(
            session.authorize(&[Role::Admin]),
            Access::Denied { role: Role::Alumni }
        );
        assert_eq!(Session::empty().authorize(&[Role::Admin]), Access::LoginRequired);
    }
}
