use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("TWITCH_CLIENT_SECRET is not configured; cannot obtain an app access token")]
    MissingSecret,

    #[error("token exchange failed (status {status}): {body}")]
    Exchange { status: u16, body: String },

    #[error("token endpoint unreachable: {0}")]
    Transport(String),

    #[error("invalid token grant: {0}")]
    InvalidGrant(String),
}

impl From<reqwest::Error> for TokenError {
    fn from(err: reqwest::Error) -> Self {
        TokenError::Transport(err.to_string())
    }
}

impl TokenError {
    /// A configuration error can never be recovered by retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(self, TokenError::MissingSecret)
    }
}
