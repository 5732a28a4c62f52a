//! Bearer-auth extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use common::{BearerToken, Caller};

use crate::AppState;
use crate::error::ApiError;

/// Extracts and verifies the caller behind the `Authorization` header.
///
/// Use this extractor in protected handlers; verification is delegated
/// to the injected identity verifier.
pub struct AuthCaller(pub Caller);

impl FromRequestParts<AppState> for AuthCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("authorization token required".to_string()))?;

        let raw = header.strip_prefix("Bearer ").unwrap_or(header);
        if raw.is_empty() {
            return Err(ApiError::Unauthorized(
                "authorization token required".to_string(),
            ));
        }

        let caller = state.verifier.verify(&BearerToken::new(raw)).await?;
        Ok(AuthCaller(caller))
    }
}
