//! Builder setter methods

use std::time::Duration;

use super::builder::CrawlConfigBuilder;

impl CrawlConfigBuilder {
    #[must_use]
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Enable HEAD probing of common and CMS signature paths before the crawl.
    ///
    /// Probing issues roughly fifty extra requests against the origin, so it
    /// is off by default.
    #[must_use]
    pub fn aggressive_mode(mut self, enabled: bool) -> Self {
        self.aggressive_mode = enabled;
        self
    }

    #[must_use]
    pub fn parallel_workers(mut self, workers: usize) -> Self {
        self.parallel_workers = workers;
        self
    }

    /// Pause between batches, in seconds.
    #[must_use]
    pub fn crawl_delay(mut self, secs: f64) -> Self {
        self.crawl_delay = secs;
        self
    }

    #[must_use]
    pub fn respect_robots_delay(mut self, respect: bool) -> Self {
        self.respect_robots_delay = respect;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Run Chromium headless (default) or with a visible window for debugging.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    #[must_use]
    pub fn sitemap_timeout(mut self, timeout: Duration) -> Self {
        self.sitemap_timeout = timeout;
        self
    }

    #[must_use]
    pub fn robots_timeout(mut self, timeout: Duration) -> Self {
        self.robots_timeout = timeout;
        self
    }
}
