//! CLI argument parsing and startup helpers.

use clap::Parser;
use tracing::{error, info};

use crate::config::{ACCESS_SECRET_VAR, REFRESH_SECRET_VAR, TokenConfig};

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "lebbnb",
    about = "Session token backend and admin route guard for Lebbnb"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "4000")]
    pub port: u16,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load token configuration from the environment.
/// Returns None and logs an error if a secret is missing or an expiry is invalid.
pub fn load_token_config() -> Option<TokenConfig> {
    let config = match TokenConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid token configuration");
            return None;
        }
    };

    // Clear the secrets to prevent leaking them to child processes
    // SAFETY: Runs during startup before the server accepts connections or
    // spawns tasks. The runtime's worker threads are idle and nothing else in
    // the process reads or writes the environment concurrently.
    unsafe {
        std::env::remove_var(ACCESS_SECRET_VAR);
        std::env::remove_var(REFRESH_SECRET_VAR);
    }

    info!(
        access_expiry_secs = config.access_expiry.as_secs(),
        refresh_expiry_secs = config.refresh_expiry.as_secs(),
        secure_cookies = config.secure_cookies,
        "Token configuration loaded"
    );

    Some(config)
}
