//! Single page processing logic
//!
//! Handles the lifecycle of rendering one URL:
//! - Worker permit acquisition
//! - Isolated context creation and navigation
//! - Metadata and link extraction
//! - Context teardown, on every path

use log::{debug, info, warn};
use std::time::Duration;
use tokio::sync::Semaphore;
use url::{Origin, Url};

use super::crawl_types::CrawlQueue;
use super::page_timeout::with_page_timeout;
use crate::page_extractor::{DomSnapshot, PageMetadata, extract_links, extract_metadata};
use crate::renderer::{PageHandle, PageRenderer, RenderError};

/// Shared, read-only state for every page of a batch.
pub struct PageProcessorContext<'a, R> {
    pub renderer: &'a R,
    pub semaphore: &'a Semaphore,
    pub origin: &'a Origin,
    pub user_agent: &'a str,
    pub navigation_timeout: Duration,
}

/// What the driver merges back into the frontier.
#[derive(Debug)]
pub enum PageOutcome {
    Rendered {
        item: CrawlQueue,
        metadata: PageMetadata,
    },
    Failed {
        item: CrawlQueue,
        error: RenderError,
    },
}

/// Render `item` in its own isolated context and extract its data.
///
/// The context is closed whether or not rendering succeeded.
pub async fn process_single_page<R: PageRenderer>(
    ctx: &PageProcessorContext<'_, R>,
    item: CrawlQueue,
) -> PageOutcome {
    let _permit = match ctx.semaphore.acquire().await {
        Ok(permit) => permit,
        Err(_) => {
            return PageOutcome::Failed {
                item,
                error: RenderError::Context("worker pool closed".to_string()),
            };
        }
    };

    info!(target: "sitescout::crawl", "Crawling [depth {}]: {}", item.depth, item.url);

    let page = match ctx.renderer.new_isolated_context(ctx.user_agent).await {
        Ok(page) => page,
        Err(error) => {
            warn!(target: "sitescout::crawl", "Failed to open context for {}: {error}", item.url);
            return PageOutcome::Failed { item, error };
        }
    };

    let rendered = render(ctx, &page, &item.url).await;

    if let Err(e) = page.close().await {
        warn!(target: "sitescout::crawl", "Failed to close context for {}: {e}", item.url);
    }

    match rendered {
        Ok(metadata) => PageOutcome::Rendered { item, metadata },
        Err(error) => PageOutcome::Failed { item, error },
    }
}

async fn render<R: PageRenderer>(
    ctx: &PageProcessorContext<'_, R>,
    page: &R::Page,
    url: &str,
) -> Result<PageMetadata, RenderError> {
    let requested = Url::parse(url).map_err(|e| RenderError::Navigation {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    with_page_timeout(
        page.navigate(url, ctx.navigation_timeout, true),
        ctx.navigation_timeout,
        url,
    )
    .await?;

    // Links resolve against where the page ended up after redirects.
    let current = match page.current_url().await {
        Ok(current) => Url::parse(&current).unwrap_or(requested),
        Err(e) => {
            debug!(target: "sitescout::crawl", "{url}: could not read current URL: {e}");
            requested
        }
    };

    let mut metadata = extract_metadata(page, url).await;

    let snapshot = DomSnapshot::capture(page, current).await;
    let report = extract_links(&snapshot, ctx.origin);
    debug!(
        target: "sitescout::crawl",
        "{url}: {} links, {} strategies failed",
        report.urls.len(),
        report.failures.len()
    );
    metadata.links = report.urls;

    Ok(metadata)
}
