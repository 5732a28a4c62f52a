//! Static token-to-identity verifier for tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{BearerToken, Caller, Role, UserId};

use crate::{AuthError, IdentityVerifier};

/// Verifier backed by a fixed token → identity map.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityVerifier {
    identities: Arc<RwLock<HashMap<String, (UserId, Role)>>>,
    unavailable: Arc<RwLock<bool>>,
}

impl StaticIdentityVerifier {
    /// Creates an empty verifier; every token is invalid until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token as verifying to the given identity.
    pub fn register(&self, token: impl Into<String>, user_id: UserId, role: Role) {
        self.identities
            .write()
            .unwrap()
            .insert(token.into(), (user_id, role));
    }

    /// Simulates the auth service being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().unwrap() = unavailable;
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, token: &BearerToken) -> Result<Caller, AuthError> {
        if *self.unavailable.read().unwrap() {
            return Err(AuthError::Unavailable("connection refused".to_string()));
        }
        self.identities
            .read()
            .unwrap()
            .get(token.as_str())
            .map(|(user_id, role)| Caller::new(*user_id, *role, token.clone()))
            .ok_or(AuthError::InvalidToken)
    }
}
