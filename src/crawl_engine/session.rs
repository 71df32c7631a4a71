//! Crawl session facade.
//!
//! Sequences the phases of one crawl: robots.txt, sitemap resolution,
//! optional path probing, then the breadth-first render loop. Only a bad
//! configuration or start URL aborts a session; every later failure is
//! recorded in [`CrawlResult::errors`].

use log::info;
use url::Url;

use super::crawl_types::{CrawlError, CrawlResult};
use super::frontier::Frontier;
use super::orchestrator::CrawlScheduler;
use super::progress::{CrawlPhase, NoOpProgress, ProgressReporter};
use crate::config::CrawlConfig;
use crate::discovery::{SitemapResolver, fetch_robots, probe_paths, seed_sitemaps};
use crate::fetcher::HttpFetcher;
use crate::renderer::PageRenderer;
use crate::utils::{normalize_url, origin_base};

/// One crawl configuration bound to its HTTP and rendering collaborators.
///
/// A session holds no state between runs; [`CrawlSession::run`] may be
/// called repeatedly and concurrently.
pub struct CrawlSession<F, R, P = NoOpProgress> {
    config: CrawlConfig,
    fetcher: F,
    renderer: R,
    progress: P,
}

impl<F: HttpFetcher, R: PageRenderer> CrawlSession<F, R, NoOpProgress> {
    /// Validate `config` and bind it to its collaborators.
    pub fn new(config: CrawlConfig, fetcher: F, renderer: R) -> Result<Self, CrawlError> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher,
            renderer,
            progress: NoOpProgress,
        })
    }
}

impl<F: HttpFetcher, R: PageRenderer, P: ProgressReporter> CrawlSession<F, R, P> {
    #[must_use]
    pub fn with_progress<Q: ProgressReporter>(self, progress: Q) -> CrawlSession<F, R, Q> {
        CrawlSession {
            config: self.config,
            fetcher: self.fetcher,
            renderer: self.renderer,
            progress,
        }
    }

    #[must_use]
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Give back the renderer, e.g. to shut a browser down.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Crawl the site rooted at `start_url`.
    ///
    /// # Errors
    /// Returns [`CrawlError::InvalidStartUrl`] if `start_url` is not an
    /// absolute http(s) URL with a host.
    pub async fn run(&self, start_url: &str) -> Result<CrawlResult, CrawlError> {
        let start = parse_start_url(start_url)?;
        let origin = start.origin();
        let base = origin_base(&origin);
        let mut config = self.config.clone();
        let mut result = CrawlResult::default();

        info!(target: "sitescout::crawl", "Starting crawl of {start}");

        self.progress.report_phase(CrawlPhase::Robots);
        match fetch_robots(&self.fetcher, &base, config.robots_timeout()).await {
            Ok(directives) => {
                if config.respect_robots_delay()
                    && let Some(delay) = directives.crawl_delay
                    && config.raise_crawl_delay(delay)
                {
                    info!(target: "sitescout::crawl", "Using robots.txt crawl delay of {delay}s");
                }
                result.robots_data = Some(directives);
            }
            Err(entry) => {
                self.progress.report_error(&entry.url, &entry.message);
                result.errors.push(entry);
            }
        }

        self.progress.report_phase(CrawlPhase::Sitemaps);
        let seeds = seed_sitemaps(result.robots_data.as_ref(), &base);
        let sitemaps = SitemapResolver::new(&self.fetcher, config.sitemap_timeout())
            .resolve(seeds)
            .await;
        info!(
            target: "sitescout::crawl",
            "Sitemaps yielded {} URLs from {} documents",
            sitemaps.page_urls.len(),
            sitemaps.sitemap_urls.len()
        );
        for entry in &sitemaps.errors {
            self.progress.report_error(&entry.url, &entry.message);
        }
        result.sitemap_urls = sitemaps.sitemap_urls;
        result.errors.extend(sitemaps.errors);

        let mut frontier = Frontier::new();
        frontier.seed(start.as_str());
        for url in sitemaps.page_urls {
            frontier.seed(url);
        }

        if config.aggressive_mode() {
            self.progress.report_phase(CrawlPhase::Probing);
            let probe = probe_paths(&self.fetcher, &base, config.probe_timeout()).await;
            info!(
                target: "sitescout::crawl",
                "Probing confirmed {} paths",
                probe.confirmed.len()
            );
            for url in probe.confirmed {
                frontier.seed(url);
            }
            result.detected_cms = probe.detected_cms.into_iter().collect();
        }

        self.progress.report_phase(CrawlPhase::Crawling);
        let output = CrawlScheduler::new(&self.renderer, &config, &origin, &self.progress)
            .run(&mut frontier)
            .await;

        result.pages = output.pages;
        result.errors.extend(output.errors);
        result.stats = output.stats;
        result.discovered_urls = frontier.into_discovered();
        Ok(result)
    }
}

fn parse_start_url(raw: &str) -> Result<Url, CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidStartUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(normalize_url(url))
}
