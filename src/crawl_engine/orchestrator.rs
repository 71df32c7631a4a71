//! Breadth-first crawl driver
//!
//! Coordinates multi-page crawling with:
//! - Batch selection from the frontier
//! - Concurrent rendering bounded by a semaphore
//! - Merging outcomes back into the frontier in completion order
//! - The politeness delay between batches
//!
//! Frontier state is only touched by the driver, between and after batch
//! futures complete. Render futures are polled in place, so renderers need
//! not be `Send`.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, info, warn};
use std::time::Instant;
use tokio::sync::Semaphore;
use url::Origin;

use super::crawl_types::{CrawlStats, ErrorEntry, ErrorKind};
use super::frontier::Frontier;
use super::page_processor::{PageOutcome, PageProcessorContext, process_single_page};
use super::progress::ProgressReporter;
use crate::config::CrawlConfig;
use crate::page_extractor::PageMetadata;
use crate::renderer::PageRenderer;

/// Pages, errors and counters produced by one scheduler run.
#[derive(Debug, Default)]
pub struct SchedulerOutput {
    pub pages: Vec<PageMetadata>,
    pub errors: Vec<ErrorEntry>,
    pub stats: CrawlStats,
}

pub struct CrawlScheduler<'a, R, P> {
    renderer: &'a R,
    config: &'a CrawlConfig,
    origin: &'a Origin,
    progress: P,
}

impl<'a, R: PageRenderer, P: ProgressReporter> CrawlScheduler<'a, R, P> {
    pub fn new(renderer: &'a R, config: &'a CrawlConfig, origin: &'a Origin, progress: P) -> Self {
        Self {
            renderer,
            config,
            origin,
            progress,
        }
    }

    /// Drive `frontier` until it is empty or the page budget is spent.
    pub async fn run(&self, frontier: &mut Frontier) -> SchedulerOutput {
        let started = Instant::now();
        let mut output = SchedulerOutput::default();

        let max_pages = self.config.max_pages();
        let max_depth = self.config.max_depth();
        let workers = self.config.parallel_workers();
        let delay = self.config.crawl_delay_duration();

        let semaphore = Semaphore::new(workers);
        let ctx = PageProcessorContext {
            renderer: self.renderer,
            semaphore: &semaphore,
            origin: self.origin,
            user_agent: self.config.user_agent(),
            navigation_timeout: self.config.navigation_timeout(),
        };

        while !frontier.is_exhausted(max_pages) {
            let batch = frontier.next_batch(workers, max_pages, max_depth);
            if batch.is_empty() {
                continue;
            }

            output.stats.batches += 1;
            debug!(
                target: "sitescout::crawl",
                "Batch {}: {} pages, {} pending, {} visited",
                output.stats.batches,
                batch.len(),
                frontier.pending_len(),
                frontier.visited_len()
            );

            let mut in_flight: FuturesUnordered<_> = batch
                .into_iter()
                .map(|item| {
                    self.progress.report_page_started(&item.url, item.depth);
                    process_single_page(&ctx, item)
                })
                .collect();

            while let Some(outcome) = in_flight.next().await {
                self.merge(frontier, &mut output, outcome);
            }

            if !delay.is_zero() && !frontier.is_exhausted(max_pages) {
                debug!(target: "sitescout::crawl", "Waiting {delay:?} before next batch");
                tokio::time::sleep(delay).await;
            }
        }

        output.stats.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            target: "sitescout::crawl",
            "Crawl finished: {} pages rendered, {} failed, {} batches in {}ms",
            output.stats.pages_rendered,
            output.stats.pages_failed,
            output.stats.batches,
            output.stats.elapsed_ms
        );
        self.progress.report_completed(&output.stats);
        output
    }

    fn merge(&self, frontier: &mut Frontier, output: &mut SchedulerOutput, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Rendered { item, metadata } => {
                if !frontier.mark_visited(&item.url) {
                    return;
                }
                let mut queued = 0;
                for link in &metadata.links {
                    if frontier.enqueue(link.as_str(), item.depth + 1) {
                        queued += 1;
                    }
                }
                debug!(
                    target: "sitescout::crawl",
                    "{}: {} links, {queued} new",
                    item.url,
                    metadata.links.len()
                );
                self.progress.report_page_completed(&item.url, metadata.links.len());
                output.stats.pages_rendered += 1;
                output.pages.push(metadata);
            }
            PageOutcome::Failed { item, error } => {
                warn!(target: "sitescout::crawl", "Failed to crawl {}: {error}", item.url);
                let message = error.to_string();
                self.progress.report_error(&item.url, &message);
                output.stats.pages_failed += 1;
                output
                    .errors
                    .push(ErrorEntry::new(item.url, message, ErrorKind::CrawlError));
            }
        }
    }
}
