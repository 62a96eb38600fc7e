// Application state module
// Immutable per-process state shared by every connection

use super::types::Config;
use crate::github::{GithubClient, UpstreamError};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Upstream client; its connection pool is shared across requests
    pub github: GithubClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, UpstreamError> {
        let github = GithubClient::new(&config.github)?;
        Ok(Self { config, github })
    }
}
