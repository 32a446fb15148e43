use crate::cors;
use crate::proxy::{handler, ProxyState};
use anyhow::{Context, Result};
use axum::routing::post;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Router for the standalone proxy binary: raw query text on
/// `POST /igdb/<resource>`, preflight on `OPTIONS`, 400 for anything else.
pub fn standalone_router(state: ProxyState) -> Router {
    let timeout = state.config.request_timeout();
    let cors = middleware::from_fn_with_state(state.cors.clone(), cors::apply);

    Router::new()
        .route(
            "/igdb/*resource",
            post(handler::forward_raw).options(handler::preflight),
        )
        .fallback(handler::not_proxied)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // CORS sits outside the timeout so even a timed-out request
                // yields a response the browser can read.
                .layer(cors)
                .layer(TimeoutLayer::new(timeout)),
        )
}

/// Run the standalone proxy server
pub async fn run(state: ProxyState) -> Result<()> {
    let addr = state.config.listen_addr();

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(addr = %addr, "igdb proxy listening");

    let router = standalone_router(state);

    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}
