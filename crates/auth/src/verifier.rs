//! Identity verifier trait.

use async_trait::async_trait;
use common::{BearerToken, Caller};

use crate::AuthError;

/// Verifies a bearer credential into a caller identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Returns the verified identity behind `token`, or
    /// [`AuthError::InvalidToken`] if the credential does not verify.
    async fn verify(&self, token: &BearerToken) -> Result<Caller, AuthError>;
}
