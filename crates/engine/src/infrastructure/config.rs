//! Application configuration

use std::env;

use anyhow::{ensure, Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface the HTTP server binds to
    pub server_host: String,
    /// HTTP server port
    pub server_port: u16,
    /// CORS allowed origins (comma-separated, or "*" for any)
    pub cors_allowed_origins: Vec<String>,
    /// Character listing limits
    pub pagination: PaginationConfig,
}

/// Page size bounds for character listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Used when a request gives no limit
    pub default_limit: u32,
    /// Largest limit a request may ask for
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let pagination = PaginationConfig {
            default_limit: var("PAGE_LIMIT_DEFAULT", "20")
                .parse()
                .context("PAGE_LIMIT_DEFAULT must be a positive integer")?,
            max_limit: var("PAGE_LIMIT_MAX", "100")
                .parse()
                .context("PAGE_LIMIT_MAX must be a positive integer")?,
        };
        ensure!(
            pagination.default_limit >= 1 && pagination.default_limit <= pagination.max_limit,
            "PAGE_LIMIT_DEFAULT must be between 1 and PAGE_LIMIT_MAX ({})",
            pagination.max_limit
        );

        Ok(Self {
            server_host: var("SERVER_HOST", "0.0.0.0"),
            server_port: var("SERVER_PORT", "3000")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            pagination,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
