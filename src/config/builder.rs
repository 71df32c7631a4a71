//! Fluent builder for `CrawlConfig`
//!
//! Every field starts from the defaults in [`crate::utils::constants`];
//! `build()` runs validation once so an invalid configuration never reaches
//! a crawl session.

use anyhow::{Context, Result};
use std::time::Duration;

use super::types::CrawlConfig;

#[derive(Debug, Clone)]
pub struct CrawlConfigBuilder {
    pub(crate) max_pages: usize,
    pub(crate) max_depth: u32,
    pub(crate) navigation_timeout: Duration,
    pub(crate) aggressive_mode: bool,
    pub(crate) parallel_workers: usize,
    pub(crate) crawl_delay: f64,
    pub(crate) respect_robots_delay: bool,
    pub(crate) user_agent: String,
    pub(crate) headless: bool,
    pub(crate) probe_timeout: Duration,
    pub(crate) sitemap_timeout: Duration,
    pub(crate) robots_timeout: Duration,
}

impl Default for CrawlConfigBuilder {
    fn default() -> Self {
        let defaults = CrawlConfig::default();
        Self {
            max_pages: defaults.max_pages,
            max_depth: defaults.max_depth,
            navigation_timeout: defaults.navigation_timeout,
            aggressive_mode: defaults.aggressive_mode,
            parallel_workers: defaults.parallel_workers,
            crawl_delay: defaults.crawl_delay,
            respect_robots_delay: defaults.respect_robots_delay,
            user_agent: defaults.user_agent,
            headless: defaults.headless,
            probe_timeout: defaults.probe_timeout,
            sitemap_timeout: defaults.sitemap_timeout,
            robots_timeout: defaults.robots_timeout,
        }
    }
}

impl CrawlConfig {
    /// Create a builder for configuring a `CrawlConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder::default()
    }
}

impl CrawlConfigBuilder {
    /// Finish the builder, validating every field.
    ///
    /// # Errors
    ///
    /// Fails when a budget or worker count is zero, when the crawl delay is
    /// negative or not finite, when a timeout is zero, or when the user agent
    /// is blank.
    pub fn build(self) -> Result<CrawlConfig> {
        let config = CrawlConfig {
            max_pages: self.max_pages,
            max_depth: self.max_depth,
            navigation_timeout: self.navigation_timeout,
            aggressive_mode: self.aggressive_mode,
            parallel_workers: self.parallel_workers,
            crawl_delay: self.crawl_delay,
            respect_robots_delay: self.respect_robots_delay,
            user_agent: self.user_agent.trim().to_string(),
            headless: self.headless,
            probe_timeout: self.probe_timeout,
            sitemap_timeout: self.sitemap_timeout,
            robots_timeout: self.robots_timeout,
        };
        config.validate().context("Invalid crawl configuration")?;
        Ok(config)
    }
}
