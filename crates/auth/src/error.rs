//! Identity verification error types.

use thiserror::Error;

/// Errors raised by identity verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential is missing, malformed, expired, or revoked.
    #[error("invalid credential")]
    InvalidToken,

    /// The auth service is unreachable or timed out.
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}
