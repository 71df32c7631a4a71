//! Raw HTTP capability used for robots.txt, sitemap and probe requests.
//!
//! Discovery code only talks to the [`HttpFetcher`] trait so tests and
//! alternative transports can stand in for the reqwest client.

use std::time::Duration;

use reqwest::redirect::Policy;

use crate::utils::constants::MAX_REDIRECTS;

/// Body and final location of a GET request.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    /// URL after following redirects.
    pub final_url: String,
    pub body: Vec<u8>,
}

/// Status and final location of a HEAD request.
#[derive(Debug, Clone)]
pub struct HeadResponse {
    pub status: u16,
    /// URL after following redirects.
    pub final_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// HTTP fetch capability with per-call timeouts.
///
/// Both operations follow redirects and report the final URL.
#[allow(async_fn_in_trait)]
pub trait HttpFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse, FetchError>;

    async fn head(&self, url: &str, timeout: Duration) -> Result<HeadResponse, FetchError>;
}

/// [`HttpFetcher`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Build a client that sends `user_agent` and follows a bounded number of redirects.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialized.
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn map_reqwest_error(url: &str, timeout: Duration, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, timeout, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(url, timeout, e))?
            .to_vec();

        Ok(FetchResponse {
            status,
            final_url,
            body,
        })
    }

    async fn head(&self, url: &str, timeout: Duration) -> Result<HeadResponse, FetchError> {
        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, timeout, e))?;

        Ok(HeadResponse {
            status: response.status().as_u16(),
            final_url: response.url().to_string(),
        })
    }
}
