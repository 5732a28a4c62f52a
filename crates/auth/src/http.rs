//! HTTP implementation of the identity verifier.

use std::time::Duration;

use async_trait::async_trait;
use common::{BearerToken, Caller, Role, UserId};
use serde::{Deserialize, Serialize};

use crate::{AuthError, IdentityVerifier};

/// Identity verifier backed by the auth service.
///
/// Sends `POST {base}/api/auth/validate` with `{"token": ...}` and
/// expects `{"valid": bool, "user": {"id": ..., "role": ...}}`.
#[derive(Debug, Clone)]
pub struct HttpIdentityVerifier {
    validate_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    valid: bool,
    user: Option<VerifiedUser>,
}

#[derive(Debug, Deserialize)]
struct VerifiedUser {
    id: UserId,
    role: Role,
}

impl HttpIdentityVerifier {
    /// Creates a verifier for the auth service at `base_url` with the
    /// given per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            validate_url: format!("{base_url}/api/auth/validate"),
            client,
        })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    #[tracing::instrument(skip(self, token))]
    async fn verify(&self, token: &BearerToken) -> Result<Caller, AuthError> {
        let response = self
            .client
            .post(&self.validate_url)
            .json(&ValidateRequest {
                token: token.as_str(),
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    AuthError::Unavailable(e.to_string())
                } else {
                    AuthError::Unavailable(format!("validate request failed: {e}"))
                }
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidToken);
        }
        if !response.status().is_success() {
            return Err(AuthError::Unavailable(format!(
                "validate returned {}",
                response.status()
            )));
        }

        let payload: ValidateResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        match payload {
            ValidateResponse {
                valid: true,
                user: Some(user),
            } => Ok(Caller::new(user.id, user.role, token.clone())),
            _ => Err(AuthError::InvalidToken),
        }
    }
}
