//! Session API endpoints.
//!
//! - GET `/verify` - Verify the access token cookie and return its claims
//! - POST `/logout` - Clear both session cookies

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tracing::info;

use crate::auth::AccessAuth;
use crate::impl_has_token_service;
use crate::jwt::TokenService;

#[derive(Clone)]
pub struct SessionState {
    pub tokens: Arc<TokenService>,
}

impl_has_token_service!(SessionState);

pub fn router(state: SessionState) -> Router {
    Router::new()
        .route("/verify", get(verify_session))
        .route("/logout", post(logout))
        .with_state(state)
}

/// Verify that the current access token is still valid.
/// Returns 200 with the token's claims, or 401 and cleared cookies.
async fn verify_session(AccessAuth(session): AccessAuth) -> impl IntoResponse {
    (StatusCode::OK, Json(session))
}

/// Logout - clear both cookies. Tokens are stateless, so nothing is revoked.
async fn logout(State(state): State<SessionState>) -> Response {
    let mut response = (
        StatusCode::OK,
        Json(serde_json::json!({ "success": true })),
    )
        .into_response();

    state.tokens.clear_session_cookies(&mut response);
    info!("Session cookies cleared");

    response
}
