//! Session cookie parsing and rendering.

use std::fmt;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Response;

/// Cookie name for the access token (short-lived, 15 minutes by default).
pub const ACCESS_COOKIE_NAME: &str = "accessToken";

/// Cookie name for the refresh token (long-lived, 7 days by default).
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookie_header) = cookie_header.to_str() else {
            continue;
        };
        for part in cookie_header.split(';') {
            let part = part.trim();
            if let Some((key, value)) = part.split_once('=') {
                if key.trim() == name {
                    return Some(value.trim());
                }
            }
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A cookie to be written with `Set-Cookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: &'static str,
    pub value: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: &'static str,
    /// Max age in milliseconds
    pub max_age_ms: u64,
}

impl SetCookie {
    /// Site-wide, script-inaccessible, same-site-strict cookie.
    pub fn session(
        name: &'static str,
        value: impl Into<String>,
        max_age: Duration,
        secure: bool,
    ) -> Self {
        Self {
            name,
            value: value.into(),
            http_only: true,
            secure,
            same_site: SameSite::Strict,
            path: "/",
            max_age_ms: u64::try_from(max_age.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Renders the `Set-Cookie` header value. `Max-Age` is in seconds on the wire.
impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        write!(f, "; SameSite={}", self.same_site.as_str())?;
        write!(f, "; Path={}", self.path)?;
        write!(f, "; Max-Age={}", self.max_age_ms / 1000)?;
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

/// Security attributes and lifetimes shared by the session cookie pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Whether to set the `Secure` attribute (production only)
    pub secure: bool,
    pub access_max_age: Duration,
    pub refresh_max_age: Duration,
}

/// Anything a `Set-Cookie` can be appended to.
pub trait CookieSink {
    fn append_cookie(&mut self, cookie: SetCookie);
}

impl CookieSink for HeaderMap {
    fn append_cookie(&mut self, cookie: SetCookie) {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                self.append(header::SET_COOKIE, value);
            }
            Err(e) => {
                tracing::warn!(cookie = cookie.name, error = %e, "Dropping unencodable cookie");
            }
        }
    }
}

impl CookieSink for Response {
    fn append_cookie(&mut self, cookie: SetCookie) {
        self.headers_mut().append_cookie(cookie);
    }
}

impl CookieSink for Vec<SetCookie> {
    fn append_cookie(&mut self, cookie: SetCookie) {
        self.push(cookie);
    }
}

/// Attach the access and refresh tokens as session cookies.
pub fn set_session_cookies<S: CookieSink + ?Sized>(
    sink: &mut S,
    access_token: &str,
    refresh_token: &str,
    policy: &CookiePolicy,
) {
    sink.append_cookie(SetCookie::session(
        ACCESS_COOKIE_NAME,
        access_token,
        policy.access_max_age,
        policy.secure,
    ));
    sink.append_cookie(SetCookie::session(
        REFRESH_COOKIE_NAME,
        refresh_token,
        policy.refresh_max_age,
        policy.secure,
    ));
}

/// Overwrite both session cookies with empty values that expire immediately.
pub fn clear_session_cookies<S: CookieSink + ?Sized>(sink: &mut S, secure: bool) {
    sink.append_cookie(SetCookie::session(
        ACCESS_COOKIE_NAME,
        "",
        Duration::ZERO,
        secure,
    ));
    sink.append_cookie(SetCookie::session(
        REFRESH_COOKIE_NAME,
        "",
        Duration::ZERO,
        secure,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(secure: bool) -> CookiePolicy {
        CookiePolicy {
            secure,
            access_max_age: Duration::from_secs(15 * 60),
            refresh_max_age: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }

    #[test]
    fn test_get_cookie_simple() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("accessToken=abc123"));

        assert_eq!(get_cookie(&headers, "accessToken"), Some("abc123"));
    }

    #[test]
    fn test_get_cookie_multiple() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; accessToken=abc123; refreshToken=xyz789"),
        );

        assert_eq!(get_cookie(&headers, "accessToken"), Some("abc123"));
        assert_eq!(get_cookie(&headers, "refreshToken"), Some("xyz789"));
        assert_eq!(get_cookie(&headers, "foo"), Some("bar"));
    }

    #[test]
    fn test_get_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("foo=bar"));
        headers.append(header::COOKIE, HeaderValue::from_static("refreshToken=xyz"));

        assert_eq!(get_cookie(&headers, "refreshToken"), Some("xyz"));
    }

    #[test]
    fn test_get_cookie_empty_value_is_present() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("accessToken="));

        assert_eq!(get_cookie(&headers, "accessToken"), Some(""));
    }

    #[test]
    fn test_get_cookie_not_found() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("xaccessToken=1"));

        assert_eq!(get_cookie(&headers, "accessToken"), None);
    }

    #[test]
    fn test_get_cookie_no_header() {
        let headers = HeaderMap::new();
        assert_eq!(get_cookie(&headers, "accessToken"), None);
    }

    #[test]
    fn test_render_session_cookie() {
        let cookie =
            SetCookie::session(ACCESS_COOKIE_NAME, "abc", Duration::from_secs(900), false);

        assert_eq!(cookie.max_age_ms, 900_000);
        assert_eq!(
            cookie.to_string(),
            "accessToken=abc; HttpOnly; SameSite=Strict; Path=/; Max-Age=900"
        );
    }

    #[test]
    fn test_render_secure_cookie() {
        let cookie = SetCookie::session(
            REFRESH_COOKIE_NAME,
            "xyz",
            Duration::from_secs(604_800),
            true,
        );

        assert_eq!(cookie.max_age_ms, 604_800_000);
        assert_eq!(
            cookie.to_string(),
            "refreshToken=xyz; HttpOnly; SameSite=Strict; Path=/; Max-Age=604800; Secure"
        );
    }

    #[test]
    fn test_huge_max_age_saturates() {
        let cookie = SetCookie::session(ACCESS_COOKIE_NAME, "abc", Duration::MAX, false);

        assert_eq!(cookie.max_age_ms, u64::MAX);
        assert!(cookie.to_string().ends_with(&format!("Max-Age={}", u64::MAX / 1000)));
    }

    #[test]
    fn test_set_session_cookies_on_headers() {
        let mut headers = HeaderMap::new();
        set_session_cookies(&mut headers, "a.b.c", "d.e.f", &policy(false));

        let values: Vec<&str> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();

        assert_eq!(
            values,
            vec![
                "accessToken=a.b.c; HttpOnly; SameSite=Strict; Path=/; Max-Age=900",
                "refreshToken=d.e.f; HttpOnly; SameSite=Strict; Path=/; Max-Age=604800",
            ]
        );
    }

    #[test]
    fn test_clear_session_cookies_on_headers() {
        let mut headers = HeaderMap::new();
        clear_session_cookies(&mut headers, true);

        let values: Vec<&str> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();

        assert_eq!(
            values,
            vec![
                "accessToken=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0; Secure",
                "refreshToken=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0; Secure",
            ]
        );
    }

    #[test]
    fn test_unencodable_cookie_is_dropped() {
        let mut headers = HeaderMap::new();
        headers.append_cookie(SetCookie::session(
            ACCESS_COOKIE_NAME,
            "bad\nvalue",
            Duration::from_secs(1),
            false,
        ));

        assert!(headers.get(header::SET_COOKIE).is_none());
    }
}
