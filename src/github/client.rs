//! GitHub Contents API client

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Url};

use super::error::UpstreamError;
use super::types::Contents;
use crate::config::GithubConfig;
use crate::logger;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Client bound to a single `owner/repo@branch`
pub struct GithubClient {
    http: Client,
    api_base: Url,
    owner: String,
    repo: String,
    branch: String,
    token: Option<String>,
    user_agent: String,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, UpstreamError> {
        let api_base = Url::parse(&config.api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(UpstreamError::InvalidApiBase(config.api_base.clone()));
        }

        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        Ok(Self {
            http: builder.build()?,
            api_base,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            token: config.token.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// `{api_base}/repos/{owner}/{repo}/contents/{path}?ref={branch}`
    ///
    /// Each path segment is percent-encoded on its own and empty segments are
    /// skipped, so `"/a"` and `"a/"` address the same entry as `"a"`.
    pub fn contents_url(&self, path: &str) -> Result<Url, UpstreamError> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| UpstreamError::InvalidApiBase(self.api_base.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
                .extend(path.split('/').filter(|segment| !segment.is_empty()));
        }
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Ok(url)
    }

    /// Fetch and decode the contents of `path`; exactly one upstream request
    pub async fn fetch_contents(&self, path: &str) -> Result<Contents, UpstreamError> {
        let url = self.contents_url(path)?;
        logger::log_debug(&format!("[Upstream] GET {url}"));

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, &self.user_agent);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        logger::log_debug(&format!("[Upstream] {status} for /{path}"));

        if !status.is_success() {
            let rate_limit_remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                rate_limit_remaining,
            });
        }

        let body = response.bytes().await?;
        Contents::from_slice(&body)
    }
}
