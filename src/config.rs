use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const DEFAULT_API_BASE_URL: &str = "https://api.igdb.com/v4";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Listen host address (standalone proxy only)
    pub host: String,

    /// Listen port (standalone proxy only)
    pub port: u16,

    /// Twitch application client id, sent as `Client-ID` on every upstream call
    pub client_id: String,

    /// Twitch application client secret; only needed when no static token is set
    pub client_secret: Option<String>,

    /// Pre-issued app access token; used exclusively and never refreshed
    pub static_token: Option<String>,

    /// Twitch OAuth token endpoint
    pub token_url: String,

    /// IGDB API base URL
    pub api_base_url: String,

    /// Fixed CORS origin; `None` echoes the request origin, falling back to `*`
    pub allowed_origin: Option<String>,

    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,

    /// Log level
    pub log_level: String,
}

impl ProxyConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("PROXY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PROXY_PORT")
            .unwrap_or_else(|_| "8070".to_string())
            .parse()
            .context("Invalid PROXY_PORT")?;

        let client_id =
            std::env::var("TWITCH_CLIENT_ID").context("TWITCH_CLIENT_ID must be set")?;

        let client_secret = std::env::var("TWITCH_CLIENT_SECRET").ok();

        let static_token = std::env::var("TWITCH_APP_TOKEN").ok();

        let token_url =
            std::env::var("TWITCH_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string());

        let api_base_url =
            std::env::var("IGDB_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let allowed_origin = Some(
            std::env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string()),
        );

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("Invalid REQUEST_TIMEOUT_SECS")?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            client_id,
            client_secret,
            static_token,
            token_url,
            api_base_url,
            allowed_origin,
            request_timeout_secs,
            log_level,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            anyhow::bail!("TWITCH_CLIENT_ID cannot be empty");
        }

        if self.token_url.is_empty() {
            anyhow::bail!("TWITCH_TOKEN_URL cannot be empty");
        }

        if self.api_base_url.is_empty() {
            anyhow::bail!("IGDB_API_URL cannot be empty");
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        Ok(())
    }

    /// Whether a refresh can ever succeed; false means queries only work
    /// while the static token remains valid, or not at all.
    pub fn can_refresh(&self) -> bool {
        self.client_secret.is_some()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the listen address
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
