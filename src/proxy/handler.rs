use super::{ProxyError, ProxyState};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;

/// Standalone adapter: the request body is the raw IGDB query text.
pub async fn forward_raw(
    State(state): State<ProxyState>,
    Path(resource): Path<String>,
    body: String,
) -> Result<Response, ProxyError> {
    let reply = state.igdb.forward(&resource, &body).await?;
    Ok(reply.into_response())
}

/// In-process adapter: the request body is a JSON envelope holding the query.
pub async fn forward_json(
    State(state): State<ProxyState>,
    Path(resource): Path<String>,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let query = extract_query(&body)?;
    let reply = state.igdb.forward(&resource, &query).await?;
    Ok(reply.into_response())
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    query: Option<String>,
}

/// Parsed by hand rather than with the `Json` extractor so malformed
/// payloads produce the same 400 `{"error": ...}` shape as every other
/// local rejection.
fn extract_query(body: &[u8]) -> Result<String, ProxyError> {
    let envelope: QueryEnvelope =
        serde_json::from_slice(body).map_err(|_| ProxyError::MissingQuery)?;

    match envelope.query {
        Some(query) if !query.trim().is_empty() => Ok(query),
        _ => Err(ProxyError::MissingQuery),
    }
}

/// Preflight response; the CORS middleware supplies the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Anything outside the proxy routes is a caller mistake, not a 404 worth
/// forwarding.
pub async fn not_proxied() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "resource required" })),
    )
        .into_response()
}
