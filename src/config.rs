//! Runtime configuration loaded from the environment

use anyhow::{Context, Result};
use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_PATH: &str = "data.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Prefix for every short link, e.g. "https://short.ly/".
    /// Used verbatim, so it should end with a slash.
    pub base_url: String,

    /// Port to listen on
    pub port: u16,

    /// Path of the redb database file
    pub database_path: String,
}

impl AppConfig {
    /// Reads `AWS_GATEWAY_BASE_URL`, `PORT` and `DATABASE_URL`.
    ///
    /// Call after `dotenvy::dotenv()` so a `.env` file is honored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let base_url = match lookup("AWS_GATEWAY_BASE_URL").filter(|v| !v.is_empty()) {
            Some(url) => url,
            None => {
                let fallback = format!("http://localhost:{port}/");
                tracing::warn!(%fallback, "AWS_GATEWAY_BASE_URL not set, using fallback");
                fallback
            }
        };

        let database_path =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        Ok(Self {
            base_url,
            port,
            database_path,
        })
    }
}
