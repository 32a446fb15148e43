mod client;
mod error;
pub(crate) mod handler;

pub use client::{IgdbClient, UpstreamReply};
pub use error::ProxyError;

use crate::config::ProxyConfig;
use crate::cors::CorsPolicy;
use crate::token::TokenManager;
use std::sync::Arc;

/// Shared state behind both inbound adapters: the standalone proxy binary
/// and the mountable route table.
#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<ProxyConfig>,
    pub igdb: Arc<IgdbClient>,
    pub cors: CorsPolicy,
}

impl ProxyState {
    pub fn new(config: ProxyConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let tokens = Arc::new(TokenManager::new(&config)?);
        let igdb = Arc::new(IgdbClient::new(&config, tokens)?);
        let cors = CorsPolicy::new(config.allowed_origin.as_deref())?;

        Ok(Self { config, igdb, cors })
    }
}
