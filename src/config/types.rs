//! Core configuration type for a crawl session
//!
//! `CrawlConfig` is validated once when built and is treated as immutable
//! afterwards, with one exception: the politeness delay may be raised (never
//! lowered) when robots.txt publishes a larger `Crawl-delay`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::constants::{
    DEFAULT_CRAWL_DELAY_SECS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEFAULT_NAVIGATION_TIMEOUT,
    DEFAULT_PARALLEL_WORKERS, DEFAULT_USER_AGENT, MAX_CRAWL_DELAY_SECS, PROBE_TIMEOUT,
    ROBOTS_TIMEOUT, SITEMAP_TIMEOUT,
};

/// Main configuration struct for a crawl session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Page budget: the crawl never renders more than this many pages.
    pub(crate) max_pages: usize,

    /// Deepest link level (seeds are depth 0) that is still rendered.
    pub(crate) max_depth: u32,

    /// Timeout for a single page navigation.
    pub(crate) navigation_timeout: Duration,

    /// Probe common and CMS-specific paths before crawling.
    pub(crate) aggressive_mode: bool,

    /// Number of pages rendered concurrently per batch.
    pub(crate) parallel_workers: usize,

    /// Pause between batches in seconds.
    pub(crate) crawl_delay: f64,

    /// Raise `crawl_delay` to the robots.txt `Crawl-delay` when it is larger.
    pub(crate) respect_robots_delay: bool,

    /// User agent for HTTP requests and page contexts.
    pub(crate) user_agent: String,

    /// Run the Chromium adapter without a visible window.
    pub(crate) headless: bool,

    /// Timeout for each HEAD existence probe.
    pub(crate) probe_timeout: Duration,

    /// Timeout for each sitemap document fetch.
    pub(crate) sitemap_timeout: Duration,

    /// Timeout for the robots.txt fetch.
    pub(crate) robots_timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            aggressive_mode: false,
            parallel_workers: DEFAULT_PARALLEL_WORKERS,
            crawl_delay: DEFAULT_CRAWL_DELAY_SECS,
            respect_robots_delay: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headless: true,
            probe_timeout: PROBE_TIMEOUT,
            sitemap_timeout: SITEMAP_TIMEOUT,
            robots_timeout: ROBOTS_TIMEOUT,
        }
    }
}

/// Reasons a configuration is rejected at session start.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_pages must be at least 1")]
    ZeroMaxPages,

    #[error("parallel_workers must be at least 1")]
    ZeroWorkers,

    #[error("crawl_delay must be between 0 and 60 seconds (got {0})")]
    InvalidCrawlDelay(f64),

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("user_agent must not be empty")]
    EmptyUserAgent,
}

impl CrawlConfig {
    /// Check every invariant the scheduler relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pages == 0 {
            return Err(ConfigError::ZeroMaxPages);
        }
        if self.parallel_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if !(0.0..=MAX_CRAWL_DELAY_SECS).contains(&self.crawl_delay) {
            return Err(ConfigError::InvalidCrawlDelay(self.crawl_delay));
        }
        for (name, timeout) in [
            ("navigation", self.navigation_timeout),
            ("probe", self.probe_timeout),
            ("sitemap", self.sitemap_timeout),
            ("robots", self.robots_timeout),
        ] {
            if timeout.is_zero() {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        Ok(())
    }

    /// Raise the politeness delay to `secs` if it is larger than the current one.
    ///
    /// Returns `true` when the delay changed. Non-finite values are ignored
    /// and values above [`MAX_CRAWL_DELAY_SECS`] are clamped to it.
    pub fn raise_crawl_delay(&mut self, secs: f64) -> bool {
        if !secs.is_finite() {
            return false;
        }
        let secs = secs.min(MAX_CRAWL_DELAY_SECS);
        if secs > self.crawl_delay {
            self.crawl_delay = secs;
            true
        } else {
            false
        }
    }
}
