//! Upstream failure taxonomy

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// GitHub answered outside 2xx (missing path, auth failure, rate limit, outage)
    #[error("upstream returned HTTP {status} (rate limit remaining: {})", .rate_limit_remaining.as_deref().unwrap_or("-"))]
    Status {
        status: u16,
        rate_limit_remaining: Option<String>,
    },

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Transport(reqwest::Error),

    #[error("unexpected upstream payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("file descriptor for '{path}' has no download_url")]
    MissingDownloadUrl { path: String },

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("API base '{0}' cannot carry a path")]
    InvalidApiBase(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

impl UpstreamError {
    /// Status code reported to the client
    ///
    /// Every non-success upstream status collapses into 404.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Status { .. } => 404,
            Self::Timeout => 504,
            Self::Transport(_)
            | Self::Payload(_)
            | Self::MissingDownloadUrl { .. }
            | Self::InvalidUrl(_)
            | Self::InvalidApiBase(_) => 502,
        }
    }
}
