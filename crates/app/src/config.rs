//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use std::env;

use anyhow::Result;
use tokengate_auth::AuthConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Token verification parameters
    pub auth: AuthConfig,

    /// Runtime configuration
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            auth: AuthConfig::from_env()?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}
