//! Token configuration: signing secrets, lifetimes and cookie security.
//!
//! Built once at startup and handed to [`crate::jwt::TokenService::new`].
//! Tests construct it directly with fixed secrets instead of touching the
//! process environment.

use std::time::Duration;

/// Environment variable holding the access token secret.
pub const ACCESS_SECRET_VAR: &str = "JWT_ACCESS_SECRET";

/// Environment variable holding the refresh token secret.
pub const REFRESH_SECRET_VAR: &str = "JWT_REFRESH_SECRET";

/// Environment variable overriding the access token lifetime.
pub const ACCESS_EXPIRY_VAR: &str = "JWT_ACCESS_EXPIRY";

/// Environment variable overriding the refresh token lifetime.
pub const REFRESH_EXPIRY_VAR: &str = "JWT_REFRESH_EXPIRY";

/// Environment variable selecting the deployment mode.
pub const NODE_ENV_VAR: &str = "NODE_ENV";

/// Access token lifetime: 15 minutes
pub const DEFAULT_ACCESS_EXPIRY: Duration = Duration::from_secs(15 * 60);

/// Refresh token lifetime: 7 days
pub const DEFAULT_REFRESH_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Longest lifetime `parse_expiry` accepts: 100 years
pub const MAX_EXPIRY: Duration = Duration::from_secs(100 * 31_557_600);

/// Configuration for the token service.
#[derive(Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_expiry: Duration,
    pub refresh_expiry: Duration,
    /// Whether cookies carry the `Secure` attribute (production only)
    pub secure_cookies: bool,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_expiry", &self.access_expiry)
            .field("refresh_expiry", &self.refresh_expiry)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl TokenConfig {
    /// Create a configuration with default lifetimes and non-secure cookies.
    /// Empty secrets are treated as missing.
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();

        if access_secret.is_empty() {
            return Err(ConfigError::MissingSecret(ACCESS_SECRET_VAR));
        }
        if refresh_secret.is_empty() {
            return Err(ConfigError::MissingSecret(REFRESH_SECRET_VAR));
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_expiry: DEFAULT_ACCESS_EXPIRY,
            refresh_expiry: DEFAULT_REFRESH_EXPIRY,
            secure_cookies: false,
        })
    }

    pub fn with_access_expiry(mut self, expiry: Duration) -> Self {
        self.access_expiry = expiry;
        self
    }

    pub fn with_refresh_expiry(mut self, expiry: Duration) -> Self {
        self.refresh_expiry = expiry;
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Build the configuration from a variable lookup function.
    ///
    /// Both secrets are required. Expiries fall back to 15 minutes and 7 days.
    /// Cookies are marked `Secure` only when `NODE_ENV` is `production`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret = lookup(ACCESS_SECRET_VAR).unwrap_or_default();
        let refresh_secret = lookup(REFRESH_SECRET_VAR).unwrap_or_default();
        let mut config = Self::new(access_secret, refresh_secret)?;

        if let Some(raw) = lookup(ACCESS_EXPIRY_VAR) {
            config.access_expiry = parse_expiry(&raw)
                .map_err(|e| ConfigError::InvalidExpiry(ACCESS_EXPIRY_VAR, e))?;
        }
        if let Some(raw) = lookup(REFRESH_EXPIRY_VAR) {
            config.refresh_expiry = parse_expiry(&raw)
                .map_err(|e| ConfigError::InvalidExpiry(REFRESH_EXPIRY_VAR, e))?;
        }

        config.secure_cookies = lookup(NODE_ENV_VAR).as_deref() == Some("production");

        Ok(config)
    }

    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Parse a lifetime such as `15m`, `7d`, `2 hours` or `90s`.
///
/// A bare number is read as milliseconds. Sub-second remainders are dropped
/// since token timestamps have one-second resolution. Lifetimes longer than
/// [`MAX_EXPIRY`] are rejected.
pub fn parse_expiry(raw: &str) -> Result<Duration, String> {
    let s = raw.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);

    let value: f64 = number
        .parse()
        .map_err(|_| format!("'{}' does not start with a number", raw))?;

    let unit_ms: f64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => 1_000.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60_000.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000.0,
        "d" | "day" | "days" => 86_400_000.0,
        "w" | "week" | "weeks" => 604_800_000.0,
        "y" | "yr" | "yrs" | "year" | "years" => 31_557_600_000.0,
        other => return Err(format!("unknown unit '{}'", other)),
    };

    let secs = (value * unit_ms / 1_000.0).floor();
    if !secs.is_finite() || secs < 1.0 {
        return Err(format!("'{}' is shorter than one second", raw));
    }
    if secs > MAX_EXPIRY.as_secs() as f64 {
        return Err(format!("'{}' is longer than 100 years", raw));
    }

    Ok(Duration::from_secs(secs as u64))
}

/// Fatal configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required secret is unset or empty
    MissingSecret(&'static str),
    /// An expiry variable could not be parsed
    InvalidExpiry(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingSecret(var) => {
                write!(f, "{} is not defined in environment variables", var)
            }
            ConfigError::InvalidExpiry(var, reason) => {
                write!(f, "{} is not a valid duration: {}", var, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
