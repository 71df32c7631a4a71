//! Shared configuration constants for sitescout
//!
//! Default values and hard caps used across discovery, extraction and
//! scheduling so that none of them appear as magic numbers in the code.

use std::time::Duration;

/// Default page budget for a single crawl session.
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Default maximum link depth from the seed set.
///
/// Seeds (start URL, sitemap pages, probed paths) sit at depth 0.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Default number of concurrently rendered pages.
pub const DEFAULT_PARALLEL_WORKERS: usize = 3;

/// Default pause between crawl batches, in seconds.
///
/// A larger `Crawl-delay` published in robots.txt raises this value when
/// `respect_robots_delay` is enabled.
pub const DEFAULT_CRAWL_DELAY_SECS: f64 = 1.0;

/// Upper bound on the politeness delay, in seconds.
///
/// Larger robots.txt `Crawl-delay` values are clamped to this.
pub const MAX_CRAWL_DELAY_SECS: f64 = 60.0;

/// Default navigation timeout for a single page render.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the robots.txt fetch.
pub const ROBOTS_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for each sitemap document fetch.
///
/// Sitemaps can be several megabytes, hence longer than the probe timeout.
pub const SITEMAP_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for each HEAD existence probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default user agent sent with every request and page context.
pub const DEFAULT_USER_AGENT: &str = "SiteScout/1.0";

/// Upper bound on stylesheet rules inspected for background images.
pub const MAX_CSS_RULES: usize = 1000;

/// Upper bound on inline `<script>` tags scanned for route literals.
pub const MAX_INLINE_SCRIPTS: usize = 50;

/// Inline scripts longer than this (in characters) are skipped.
pub const MAX_SCRIPT_CHARS: usize = 100_000;

/// Maximum redirects followed by the HTTP fetcher.
pub const MAX_REDIRECTS: usize = 10;

/// XML namespace of sitemap documents.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
