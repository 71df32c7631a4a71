//! Getter methods for `CrawlConfig`

use std::time::Duration;

use super::types::CrawlConfig;
use crate::utils::constants::MAX_CRAWL_DELAY_SECS;

impl CrawlConfig {
    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    #[must_use]
    pub fn aggressive_mode(&self) -> bool {
        self.aggressive_mode
    }

    #[must_use]
    pub fn parallel_workers(&self) -> usize {
        self.parallel_workers
    }

    /// Current politeness delay in seconds.
    #[must_use]
    pub fn crawl_delay(&self) -> f64 {
        self.crawl_delay
    }

    /// Politeness delay as a `Duration`, never longer than [`MAX_CRAWL_DELAY_SECS`].
    #[must_use]
    pub fn crawl_delay_duration(&self) -> Duration {
        let secs = self.crawl_delay.clamp(0.0, MAX_CRAWL_DELAY_SECS);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }

    #[must_use]
    pub fn respect_robots_delay(&self) -> bool {
        self.respect_robots_delay
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    #[must_use]
    pub fn sitemap_timeout(&self) -> Duration {
        self.sitemap_timeout
    }

    #[must_use]
    pub fn robots_timeout(&self) -> Duration {
        self.robots_timeout
    }
}
