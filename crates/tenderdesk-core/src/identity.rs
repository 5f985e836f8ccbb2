//! User identity types.
//!
//! The acting user's identity participates in every cache key so that
//! per-user result sets never collide; it is therefore a first-class
//! domain type rather than a bare string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Opaque identifier of an authenticated portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wraps an existing UUID.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a fresh random id (used by tests and the in-memory backend).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CoreError::invalid_user_id(s))
    }
}

/// Portal role, mirrored from the backend's user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular end user: browses tenders, places bids, uploads documents.
    Bidder,
    /// Administrator: reviews bids, verifies documents, manages users.
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bidder => write!(f, "bidder"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Read-only projection of a user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    /// Registered company/firm name, if the user provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub role: UserRole,
}

impl UserProfile {
    /// Creates a new profile.
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            email: email.into(),
            company: None,
            role,
        }
    }

    /// Sets the company name.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Returns true for administrator accounts.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parse_and_display() {
        let raw = "550e8400-e29b-41d4-a716-446655440000";
        let id: UserId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_user_id_rejects_garbage() {
        let err = "not-a-uuid".parse::<UserId>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidUserId(_)));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"bidder\"").unwrap();
        assert_eq!(role, UserRole::Bidder);
    }

    #[test]
    fn test_profile_builder() {
        let profile = UserProfile::new(UserId::generate(), "ops@acme.in", UserRole::Admin)
            .with_company("Acme Pvt Ltd");
        assert!(profile.is_admin());
        assert_eq!(profile.company.as_deref(), Some("Acme Pvt Ltd"));
    }
}
