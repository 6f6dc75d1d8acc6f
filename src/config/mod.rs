//! Configuration module for the HR directory backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the remote record store; the in-memory store is used when unset
    pub store_url: Option<String>,
    /// Bearer token presented to the remote record store
    pub store_api_key: Option<String>,
    /// JSON fixture used to seed the in-memory store
    pub fixture_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("HR_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid HR_BIND_ADDR format: {}", bind_addr)))?;

        let log_level = env::var("HR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let store_url = env::var("HR_STORE_URL").ok().filter(|s| !s.trim().is_empty());

        let store_api_key = env::var("HR_STORE_API_KEY").ok().filter(|s| !s.is_empty());

        let fixture_path = env::var("HR_FIXTURE_PATH").ok().map(PathBuf::from);

        Ok(Self {
            bind_addr,
            log_level,
            store_url,
            store_api_key,
            fixture_path,
        })
    }
}
