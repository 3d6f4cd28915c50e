//! Cookie-based session authentication.
//!
//! Dual-token system: short-lived access tokens (15 min) and long-lived
//! refresh tokens (7 days), both stateless and carried in `HttpOnly`
//! cookies. The [`AccessAuth`] extractor performs full verification; the
//! route guard in [`crate::guard`] only checks cookie presence.

mod cookie;
mod errors;
mod extractors;
mod state;

pub use cookie::{
    ACCESS_COOKIE_NAME, CookiePolicy, CookieSink, REFRESH_COOKIE_NAME, SameSite, SetCookie,
    clear_session_cookies, get_cookie, set_session_cookies,
};
pub use errors::{ApiAuthError, AuthErrorKind};
pub use extractors::AccessAuth;
pub use state::HasTokenService;
