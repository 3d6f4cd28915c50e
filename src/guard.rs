//! Admin route guard.
//!
//! Runs before every request. Paths under `/admin` require the access token
//! cookie to be present, and the login page redirects to the dashboard once
//! it is. Only presence is checked: handlers behind the guard must still
//! verify the token with [`crate::jwt::TokenService`].

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::auth::{ACCESS_COOKIE_NAME, get_cookie};

/// Admin dashboard root; every guarded path lives under it.
pub const ADMIN_PATH: &str = "/admin";

/// Login page, reachable without a session.
pub const LOGIN_PATH: &str = "/admin/login";

/// Outcome of the guard for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    Redirect(&'static str),
}

/// The parts of a request the guard looks at.
pub trait GuardRequest {
    fn path(&self) -> &str;
    fn has_cookie(&self, name: &str) -> bool;
}

impl<B> GuardRequest for Request<B> {
    fn path(&self) -> &str {
        self.uri().path()
    }

    fn has_cookie(&self, name: &str) -> bool {
        get_cookie(self.headers(), name).is_some()
    }
}

/// Whether the guard applies to `path` at all: `/admin` and its sub-paths.
pub fn is_guarded(path: &str) -> bool {
    match path.strip_prefix(ADMIN_PATH) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Decide what to do with a request given its path and whether the access
/// token cookie is present.
pub fn evaluate(path: &str, has_access_cookie: bool) -> GuardDecision {
    if !is_guarded(path) {
        return GuardDecision::Continue;
    }

    // Everything under the login prefix stays reachable without a session.
    if !path.starts_with(LOGIN_PATH) && !has_access_cookie {
        return GuardDecision::Redirect(LOGIN_PATH);
    }

    if path == LOGIN_PATH && has_access_cookie {
        return GuardDecision::Redirect(ADMIN_PATH);
    }

    GuardDecision::Continue
}

/// Evaluate the guard against an abstract request.
pub fn check<R: GuardRequest + ?Sized>(request: &R) -> GuardDecision {
    evaluate(request.path(), request.has_cookie(ACCESS_COOKIE_NAME))
}

/// Middleware applying the guard, for use with `axum::middleware::from_fn`.
pub async fn admin_guard(request: Request, next: Next) -> Response {
    match check(&request) {
        GuardDecision::Continue => next.run(request).await,
        GuardDecision::Redirect(target) => {
            debug!(path = %request.uri().path(), redirect_to = target, "Guard redirect");
            Redirect::temporary(target).into_response()
        }
    }
}
