pub mod browser_setup;
pub mod config;
pub mod crawl_engine;
pub mod discovery;
pub mod fetcher;
pub mod page_extractor;
pub mod renderer;
pub mod utils;

use anyhow::Context;
use log::warn;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ConfigError, CrawlConfig, CrawlConfigBuilder};
pub use crawl_engine::{
    CleanupResult, CrawlError, CrawlPhase, CrawlResult, CrawlSession, CrawlStats, ErrorEntry,
    ErrorKind, NoOpProgress, ProgressReporter,
};
pub use discovery::RobotsDirectives;
pub use fetcher::{FetchError, HttpFetcher, ReqwestFetcher};
pub use page_extractor::schema::*;
pub use renderer::{ChromiumRenderer, PageRenderer, RenderError, StaticRenderer};

/// Crawl `start_url` with a Chromium browser.
///
/// The browser is launched for this crawl and shut down afterwards.
pub async fn crawl(start_url: &str, config: CrawlConfig) -> anyhow::Result<CrawlResult> {
    crawl_with_progress(start_url, config, NoOpProgress).await
}

/// Like [`crawl`], reporting lifecycle events to `progress`.
pub async fn crawl_with_progress<P: ProgressReporter>(
    start_url: &str,
    config: CrawlConfig,
    progress: P,
) -> anyhow::Result<CrawlResult> {
    config.validate().context("Invalid crawl configuration")?;
    let fetcher = ReqwestFetcher::new(config.user_agent()).context("Failed to build HTTP client")?;
    let renderer = ChromiumRenderer::launch(&config)
        .await
        .map_err(|e| CrawlError::Browser(format!("{e:#}")))?;

    let session = CrawlSession::new(config, fetcher, renderer)?.with_progress(progress);
    let result = session.run(start_url).await;

    if let CleanupResult::PartialFailure(errors) = session.into_renderer().shutdown().await {
        warn!(target: "sitescout::cleanup", "Browser cleanup incomplete: {errors:?}");
    }

    Ok(result?)
}

/// Crawl `start_url` without a browser: pages are fetched over HTTP and
/// queried as static HTML, so script-driven links are not discovered.
pub async fn crawl_static(start_url: &str, config: CrawlConfig) -> anyhow::Result<CrawlResult> {
    crawl_static_with_progress(start_url, config, NoOpProgress).await
}

/// Like [`crawl_static`], reporting lifecycle events to `progress`.
pub async fn crawl_static_with_progress<P: ProgressReporter>(
    start_url: &str,
    config: CrawlConfig,
    progress: P,
) -> anyhow::Result<CrawlResult> {
    let fetcher = ReqwestFetcher::new(config.user_agent()).context("Failed to build HTTP client")?;
    let renderer = StaticRenderer::new(fetcher.clone());
    let session = CrawlSession::new(config, fetcher, renderer)?.with_progress(progress);
    Ok(session.run(start_url).await?)
}
