#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    routing::get,
};
use lebbnb::{
    ServerConfig,
    config::TokenConfig,
    create_app,
    jwt::{CredentialPayload, Role, TokenService},
};

pub const ACCESS_SECRET: &str = "test-access-secret";
pub const REFRESH_SECRET: &str = "test-refresh-secret";

pub fn token_config() -> TokenConfig {
    TokenConfig::new(ACCESS_SECRET, REFRESH_SECRET).expect("Invalid test config")
}

/// Stand-in for the front-end pages. Each route answers with its own name.
pub fn pages() -> Router {
    Router::new()
        .route("/", get(|| async { "index" }))
        .route("/home", get(|| async { "home" }))
        .route("/admin", get(|| async { "dashboard" }))
        .route("/admin/settings", get(|| async { "settings" }))
        .route("/admin/login", get(|| async { "login" }))
        .route("/admin/login/reset", get(|| async { "reset" }))
        .fallback(|| async { StatusCode::NOT_FOUND })
}

pub fn create_test_app() -> Router {
    create_test_app_with(token_config())
}

pub fn create_test_app_with(tokens: TokenConfig) -> Router {
    create_app(&ServerConfig { tokens }, pages())
}

/// Token service sharing the test app's secrets.
pub fn token_service() -> TokenService {
    TokenService::new(&token_config())
}

pub fn admin_payload() -> CredentialPayload {
    CredentialPayload {
        id: "65f1c0ffee0000000000beef".to_string(),
        email: "host@lebbnb.com".to_string(),
        role: Role::Admin,
    }
}

pub fn get_request(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_request(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub async fn body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
