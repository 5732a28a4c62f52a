//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `ITEMS_SERVICE_URL` — catalog service base URL
///   (default: `"http://localhost:5001"`)
/// - `AUTH_SERVICE_URL` — auth service base URL
///   (default: `"http://localhost:4000"`)
/// - `OUTBOUND_TIMEOUT_SECS` — bounded timeout for every outbound
///   service call (default: `3`)
/// - `DATABASE_URL` — PostgreSQL connection string; the in-memory store
///   is used when unset
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub items_service_url: String,
    pub auth_service_url: String,
    pub outbound_timeout: Duration,
    pub database_url: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            items_service_url: std::env::var("ITEMS_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5001".to_string()),
            auth_service_url: std::env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string()),
            outbound_timeout: Duration::from_secs(
                std::env::var("OUTBOUND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(3),
            ),
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            items_service_url: "http://localhost:5001".to_string(),
            auth_service_url: "http://localhost:4000".to_string(),
            outbound_timeout: Duration::from_secs(3),
            database_url: None,
        }
    }
}
