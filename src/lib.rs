pub mod config;
pub mod cors;
pub mod proxy;
pub mod routes;
pub mod server;
pub mod token;

pub use config::ProxyConfig;
pub use cors::CorsPolicy;
pub use proxy::{IgdbClient, ProxyError, ProxyState};
pub use routes::igdb_router;
pub use token::{TokenError, TokenManager};
