mod error;
mod manager;

pub use error::TokenError;
pub use manager::{TokenManager, EXPIRY_MARGIN_SECS};
