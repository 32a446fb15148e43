use crate::cors;
use crate::proxy::{handler, ProxyState};
use axum::routing::post;
use axum::{middleware, Router};

/// Mountable route table for hosts that embed the proxy in their own app
/// server instead of running the standalone binary. The payload is a JSON
/// envelope (`{"query": "..."}`) rather than raw query text.
pub fn igdb_router(state: ProxyState) -> Router {
    let cors = middleware::from_fn_with_state(state.cors.clone(), cors::apply);

    Router::new()
        .route(
            "/api/igdb/:resource",
            post(handler::forward_json).options(handler::preflight),
        )
        .with_state(state)
        .layer(cors)
}
