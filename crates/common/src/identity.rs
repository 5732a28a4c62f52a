//! Verified caller identity and bearer credentials.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Role attached to a verified identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary customer, scoped to their own orders.
    #[default]
    Customer,

    /// Administrator, unlocks listing and status-transition operations.
    Admin,
}

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque bearer credential presented per request.
///
/// Forwarded unchanged to outbound service calls made on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BearerToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BearerToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A verified caller: identity plus the credential it was verified from.
///
/// Produced by the identity verifier; the credential is kept so that
/// outbound calls can forward it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// The verified user ID.
    pub user_id: UserId,
    /// The verified role.
    pub role: Role,
    /// The credential this identity was verified from.
    pub token: BearerToken,
}

impl Caller {
    /// Creates a verified caller.
    pub fn new(user_id: UserId, role: Role, token: BearerToken) -> Self {
        Self {
            user_id,
            role,
            token,
        }
    }

    /// Returns true if the caller holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
