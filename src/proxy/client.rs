use super::ProxyError;
use crate::config::ProxyConfig;
use crate::token::TokenManager;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Upstream rate-limit headers relayed to the caller under an `x-igdb-`
/// prefix so the browser client can surface remaining quota.
const RATE_LIMIT_HEADERS: [(&str, &str); 3] = [
    ("ratelimit-limit", "x-igdb-ratelimit-limit"),
    ("ratelimit-remaining", "x-igdb-ratelimit-remaining"),
    ("ratelimit-reset", "x-igdb-ratelimit-reset"),
];

/// An upstream response reduced to what gets relayed: status, content type,
/// rate-limit headers, and the body as an opaque byte buffer.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub rate_limit: Vec<(&'static str, HeaderValue)>,
    pub body: Bytes,
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();

        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, self.content_type);
        for (name, value) in self.rate_limit {
            headers.insert(name, value);
        }

        response
    }
}

/// Forwards caller query payloads to the IGDB API with a valid bearer token,
/// retrying exactly once when upstream rejects the token.
pub struct IgdbClient {
    http: Client,
    api_base_url: String,
    client_id: String,
    tokens: Arc<TokenManager>,
}

impl IgdbClient {
    pub fn new(config: &ProxyConfig, tokens: Arc<TokenManager>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(20)
            .build()?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            tokens,
        })
    }

    #[instrument(skip(self, query))]
    pub async fn forward(&self, resource: &str, query: &str) -> Result<UpstreamReply, ProxyError> {
        let resource = validate_resource(resource)?;
        if query.trim().is_empty() {
            return Err(ProxyError::MissingQuery);
        }

        let token = self.tokens.get_token(false).await?;
        let reply = self.send(resource, query, &token).await?;

        // A 401 means the cached token went stale under us; refresh and
        // resend once. A second 401 is relayed as-is so a genuinely broken
        // credential cannot cause a refresh loop.
        if reply.status == StatusCode::UNAUTHORIZED && !self.tokens.is_static().await {
            warn!(resource, "upstream rejected app access token, refreshing once");
            self.tokens.invalidate().await;
            let token = self.tokens.get_token(true).await?;
            return self.send(resource, query, &token).await;
        }

        Ok(reply)
    }

    async fn send(
        &self,
        resource: &str,
        query: &str,
        token: &str,
    ) -> Result<UpstreamReply, ProxyError> {
        let url = format!("{}/{}", self.api_base_url, resource);

        debug!(url = %url, "forwarding query upstream");

        let response = self
            .http
            .post(&url)
            .header("Client-ID", &self.client_id)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(query.to_owned())
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        let status = response.status();

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));

        let mut rate_limit = Vec::new();
        for (upstream_name, relayed_name) in RATE_LIMIT_HEADERS {
            if let Some(value) = response.headers().get(upstream_name) {
                rate_limit.push((relayed_name, value.clone()));
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        info!(
            status = status.as_u16(),
            bytes = body.len(),
            "upstream response received"
        );

        Ok(UpstreamReply {
            status,
            content_type,
            rate_limit,
            body,
        })
    }
}

/// Strip leading slashes and reject anything outside the conservative
/// character set, so a caller-supplied resource can never rewrite the
/// upstream URL.
pub fn validate_resource(resource: &str) -> Result<&str, ProxyError> {
    let resource = resource.trim_start_matches('/');

    if resource.is_empty() {
        return Err(ProxyError::MissingResource);
    }

    let valid = resource
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-'));
    if !valid {
        return Err(ProxyError::InvalidResource(resource.to_string()));
    }

    Ok(resource)
}
