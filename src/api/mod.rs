mod session;

use axum::Router;
use std::sync::Arc;

use crate::jwt::TokenService;

pub use session::SessionState;

/// Create the API router.
pub fn create_api_router(tokens: Arc<TokenService>) -> Router {
    let session_state = session::SessionState { tokens };

    Router::new().nest("/auth", session::router(session_state))
}
