use super::TokenError;
use crate::config::ProxyConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Seconds subtracted from `expires_in` so a token close to expiry is
/// refreshed proactively instead of being used until upstream rejects it.
pub const EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    /// `None` for statically configured tokens, which never expire.
    expires_at: Option<Instant>,
    is_static: bool,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        match self.expires_at {
            Some(at) => at > Instant::now(),
            None => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    expires_in: u64,
}

/// Owns the process-wide app access token for the IGDB API and decides when
/// to run the client-credentials exchange against the Twitch token endpoint.
pub struct TokenManager {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: Option<String>,
    cache: RwLock<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(config: &ProxyConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let cache = config.static_token.clone().map(|value| CachedToken {
            value,
            expires_at: None,
            is_static: true,
        });

        Ok(Self {
            http,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            cache: RwLock::new(cache),
        })
    }

    /// Produce a currently-valid bearer token, exchanging credentials only
    /// when the cache cannot serve one. A static token is always returned
    /// as-is, whatever `force_refresh` says.
    #[instrument(skip(self))]
    pub async fn get_token(&self, force_refresh: bool) -> Result<String, TokenError> {
        {
            let cache = self.cache.read().await;
            if let Some(token) = cache.as_ref() {
                if token.is_static {
                    return Ok(token.value.clone());
                }
                if !force_refresh && token.is_fresh() {
                    debug!("serving cached app access token");
                    return Ok(token.value.clone());
                }
            }
        }

        self.refresh().await
    }

    async fn refresh(&self) -> Result<String, TokenError> {
        let secret = self
            .client_secret
            .as_deref()
            .ok_or(TokenError::MissingSecret)?;

        debug!(token_url = %self.token_url, "requesting app access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", secret),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Exchange {
                status: status.as_u16(),
                body,
            });
        }

        let grant: TokenGrant = response
            .json()
            .await
            .map_err(|e| TokenError::InvalidGrant(e.to_string()))?;

        let lifetime = grant.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);
        let expires_at = Instant::now() + Duration::from_secs(lifetime);

        // Concurrent refreshes race benignly: the cache is only written after
        // a fully successful exchange, the last writer wins, and a losing
        // exchange still serves its own request with the token it fetched.
        let mut cache = self.cache.write().await;
        *cache = Some(CachedToken {
            value: grant.access_token.clone(),
            expires_at: Some(expires_at),
            is_static: false,
        });

        info!(expires_in = grant.expires_in, "app access token refreshed");

        Ok(grant.access_token)
    }

    /// Drop the cached token so the next access triggers an exchange.
    /// Static tokens cannot be re-minted and are left untouched.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        match cache.as_ref() {
            Some(token) if token.is_static => {}
            _ => *cache = None,
        }
    }

    /// Whether the held token came from configuration rather than an
    /// exchange; such tokens are never refreshed on upstream 401.
    pub async fn is_static(&self) -> bool {
        self.cache
            .read()
            .await
            .as_ref()
            .map(|token| token.is_static)
            .unwrap_or(false)
    }
}
