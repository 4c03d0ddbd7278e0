//! Configuration module for the discovery backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let db_path = env::var("DISCOVERY_DB_PATH")
            .unwrap_or_else(|_| "./data/discovery.sqlite".to_string())
            .into();

        let raw_addr =
            env::var("DISCOVERY_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3001".to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|e| format!("Invalid DISCOVERY_BIND_ADDR {:?}: {}", raw_addr, e))?;

        let log_level = env::var("DISCOVERY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
        })
    }
}
