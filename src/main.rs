use axum::{Router, http::StatusCode};
use clap::Parser;
use lebbnb::cli::{Args, init_logging, load_token_config};
use lebbnb::{ServerConfig, run_server};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(tokens) = load_token_config() else {
        std::process::exit(1);
    };

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    match listener.local_addr() {
        Ok(local_addr) => info!(address = %local_addr, "Listening"),
        Err(e) => error!(error = %e, "Failed to read local address"),
    }

    // Pages are served by the front end; only the guard and API live here.
    let pages = Router::new().fallback(|| async { StatusCode::NOT_FOUND });

    let config = ServerConfig { tokens };
    if let Err(e) = run_server(config, pages, listener).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
