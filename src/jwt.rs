//! JWT token generation and validation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::auth::{CookiePolicy, CookieSink, clear_session_cookies, set_session_cookies};
use crate::config::TokenConfig;

/// Issuer claim stamped on every token.
pub const ISSUER: &str = "lebbnb-admin";

/// Audience claim stamped on every token.
pub const AUDIENCE: &str = "lebbnb-api";

/// Admin dashboard role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }
}

/// Token type for distinguishing access vs refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived token authorizing requests (15 minutes by default)
    Access,
    /// Long-lived token used to obtain new access tokens (7 days by default)
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Identity claims embedded in a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPayload {
    /// Subject (admin user id)
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// A verified token: its payload plus the timestamps it was signed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedToken {
    #[serde(flatten)]
    pub payload: CredentialPayload,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Full claim set as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    payload: CredentialPayload,
    iss: String,
    aud: String,
    iat: u64,
    exp: u64,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl SigningKeys {
    fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }
}

/// Issues and verifies access and refresh tokens, each kind under its own
/// secret, and writes them to responses as session cookies.
pub struct TokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    cookies: CookiePolicy,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            access: SigningKeys::new(&config.access_secret, config.access_expiry),
            refresh: SigningKeys::new(&config.refresh_secret, config.refresh_expiry),
            cookies: CookiePolicy {
                secure: config.secure_cookies,
                access_max_age: config.access_expiry,
                refresh_max_age: config.refresh_expiry,
            },
        }
    }

    pub fn cookie_policy(&self) -> &CookiePolicy {
        &self.cookies
    }

    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        self.keys(kind).lifetime
    }

    /// Sign an access token for the given payload.
    pub fn issue_access_token(&self, payload: &CredentialPayload) -> Result<String, TokenError> {
        self.issue(TokenKind::Access, payload, unix_now()?)
    }

    /// Sign an access token as if the current time were `now` (Unix seconds).
    pub fn issue_access_token_at(
        &self,
        payload: &CredentialPayload,
        now: u64,
    ) -> Result<String, TokenError> {
        self.issue(TokenKind::Access, payload, now)
    }

    /// Sign a refresh token for the given payload.
    pub fn issue_refresh_token(&self, payload: &CredentialPayload) -> Result<String, TokenError> {
        self.issue(TokenKind::Refresh, payload, unix_now()?)
    }

    pub fn issue_refresh_token_at(
        &self,
        payload: &CredentialPayload,
        now: u64,
    ) -> Result<String, TokenError> {
        self.issue(TokenKind::Refresh, payload, now)
    }

    /// Validate and decode an access token.
    pub fn verify_access_token(&self, token: &str) -> Result<DecodedToken, TokenError> {
        self.verify(TokenKind::Access, token, unix_now()?)
    }

    /// Validate an access token against an explicit clock reading.
    pub fn verify_access_token_at(
        &self,
        token: &str,
        now: u64,
    ) -> Result<DecodedToken, TokenError> {
        self.verify(TokenKind::Access, token, now)
    }

    /// Validate and decode a refresh token.
    pub fn verify_refresh_token(&self, token: &str) -> Result<DecodedToken, TokenError> {
        self.verify(TokenKind::Refresh, token, unix_now()?)
    }

    pub fn verify_refresh_token_at(
        &self,
        token: &str,
        now: u64,
    ) -> Result<DecodedToken, TokenError> {
        self.verify(TokenKind::Refresh, token, now)
    }

    /// Attach both tokens as session cookies.
    pub fn set_session_cookies<S: CookieSink + ?Sized>(
        &self,
        sink: &mut S,
        access_token: &str,
        refresh_token: &str,
    ) {
        set_session_cookies(sink, access_token, refresh_token, &self.cookies);
    }

    /// Overwrite both session cookies with empty, immediately expiring values.
    pub fn clear_session_cookies<S: CookieSink + ?Sized>(&self, sink: &mut S) {
        clear_session_cookies(sink, self.cookies.secure);
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn issue(
        &self,
        kind: TokenKind,
        payload: &CredentialPayload,
        now: u64,
    ) -> Result<String, TokenError> {
        if payload.id.trim().is_empty() {
            return Err(TokenError::InvalidPayload("id must not be empty"));
        }
        if payload.email.trim().is_empty() {
            return Err(TokenError::InvalidPayload("email must not be empty"));
        }

        let keys = self.keys(kind);
        let exp = now
            .checked_add(keys.lifetime.as_secs())
            .ok_or(TokenError::ExpiryOverflow)?;
        let claims = Claims {
            payload: payload.clone(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            iat: now,
            exp,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(TokenError::Encoding)
    }

    fn verify(&self, kind: TokenKind, token: &str, now: u64) -> Result<DecodedToken, TokenError> {
        let token_data =
            jsonwebtoken::decode::<Claims>(token, &self.keys(kind).decoding, &validation())
                .map_err(|e| {
                    debug!(kind = kind.as_str(), error = %e, "Token rejected");
                    TokenError::InvalidToken(kind)
                })?;

        let claims = token_data.claims;
        if now >= claims.exp {
            debug!(kind = kind.as_str(), exp = claims.exp, now, "Token expired");
            return Err(TokenError::InvalidToken(kind));
        }

        Ok(DecodedToken {
            payload: claims.payload,
            iat: claims.iat,
            exp: claims.exp,
        })
    }
}

/// Signature, issuer and audience are checked by the library. Expiry is
/// checked by the caller against its own clock reading.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = false;
    validation.set_issuer(&[ISSUER]);
    validation.set_audience(&[AUDIENCE]);
    validation.set_required_spec_claims(&["exp", "iss", "aud"]);
    validation
}

fn unix_now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| TokenError::TimeError)
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum TokenError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Payload is missing a required field
    InvalidPayload(&'static str),
    /// Bad signature, wrong issuer or audience, malformed, or expired
    InvalidToken(TokenKind),
    /// Issue time plus lifetime does not fit in a timestamp
    ExpiryOverflow,
    /// System time error
    TimeError,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            TokenError::InvalidPayload(reason) => write!(f, "Invalid token payload: {}", reason),
            TokenError::InvalidToken(kind) => {
                write!(f, "Invalid or expired {} token", kind.as_str())
            }
            TokenError::ExpiryOverflow => write!(f, "Token expiry is out of range"),
            TokenError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for TokenError {}
