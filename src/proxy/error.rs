use crate::token::TokenError;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("resource required")]
    MissingResource,

    #[error("invalid resource path: {0}")]
    InvalidResource(String),

    #[error("query required")]
    MissingQuery,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("upstream request failed: {0}")]
    Upstream(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingResource
            | ProxyError::InvalidResource(_)
            | ProxyError::MissingQuery => StatusCode::BAD_REQUEST,
            ProxyError::Token(err) if err.is_configuration() => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Token(_) | ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
