pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod guard;
pub mod jwt;

use api::create_api_router;
use axum::{Router, middleware};
use config::TokenConfig;
use guard::admin_guard;
use jwt::TokenService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Token secrets, lifetimes and cookie security
    pub tokens: TokenConfig,
}

/// Create the application router with the given configuration.
///
/// `pages` holds the front-end routes. The admin guard wraps everything, so
/// it must already contain its routes and fallback.
pub fn create_app(config: &ServerConfig, pages: Router) -> Router {
    let tokens = Arc::new(TokenService::new(&config.tokens));

    Router::new()
        .nest("/api", create_api_router(tokens))
        .merge(pages)
        .layer(middleware::from_fn(admin_guard))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(
    config: ServerConfig,
    pages: Router,
    listener: TcpListener,
) -> Result<(), std::io::Error> {
    let app = create_app(&config, pages);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service).await
}
