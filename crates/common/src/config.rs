//! Configuration loading, 12-factor style
//!
//! Everything comes from environment variables (with a `.env` file picked up
//! in development). `DATABASE_URL` is the only required variable.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Postgres connection URL
    pub database_url: String,

    /// Port the HTTP server binds to
    pub port: u16,

    /// Fallback tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid port number"))?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "knockout=debug,info".to_string());

        Ok(Self {
            database_url,
            port,
            log_level,
        })
    }
}
