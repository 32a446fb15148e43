use anyhow::{Context, Result};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::{header, HeaderValue};

/// Allowed-origin policy for relayed responses: a fixed configured origin,
/// or (when unset) the caller's own `Origin` header, falling back to `*`.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin: Option<HeaderValue>,
}

impl CorsPolicy {
    pub fn new(allowed_origin: Option<&str>) -> Result<Self> {
        let allowed_origin = match allowed_origin {
            None | Some("*") => None,
            Some(origin) => Some(
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid ALLOWED_ORIGIN: {origin}"))?,
            ),
        };

        Ok(Self { allowed_origin })
    }

    pub fn resolve(&self, request_origin: Option<&HeaderValue>) -> HeaderValue {
        self.allowed_origin
            .clone()
            .or_else(|| request_origin.cloned())
            .unwrap_or_else(|| HeaderValue::from_static("*"))
    }
}

/// Middleware adding CORS headers to every response, error paths included,
/// so browser callers can always read the body.
pub async fn apply(
    State(policy): State<CorsPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        policy.resolve(origin.as_ref()),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );

    response
}
