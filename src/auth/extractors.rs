//! Axum extractors for authentication.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use super::cookie::{ACCESS_COOKIE_NAME, get_cookie};
use super::errors::{ApiAuthError, AuthErrorKind};
use super::state::HasTokenService;
use crate::jwt::DecodedToken;

/// Extractor for API endpoints that require a valid access token.
/// Unlike the route guard, this verifies signature, issuer, audience and expiry.
/// Returns JSON errors instead of redirects.
pub struct AccessAuth(pub DecodedToken);

impl<S> FromRequestParts<S> for AccessAuth
where
    S: HasTokenService + Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = state.tokens();
        let secure = tokens.cookie_policy().secure;

        let access_token = get_cookie(&parts.headers, ACCESS_COOKIE_NAME)
            .ok_or_else(|| ApiAuthError::new(AuthErrorKind::NotAuthenticated, secure))?;

        let decoded = tokens.verify_access_token(access_token).map_err(|e| {
            debug!(path = %parts.uri.path(), error = %e, "Access token rejected");
            ApiAuthError::new(AuthErrorKind::InvalidToken, secure)
        })?;

        Ok(AccessAuth(decoded))
    }
}
