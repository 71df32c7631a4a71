//! Progress reporting abstraction for crawl sessions
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting
//! and provides a no-op implementation for simple use cases.

use super::crawl_types::CrawlStats;

/// Session phases, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Robots,
    Sitemaps,
    Probing,
    Crawling,
}

/// Receives crawl lifecycle notifications.
///
/// Implementations can send updates to channels, log to console, update UI, etc.
pub trait ProgressReporter {
    /// A session phase has started.
    fn report_phase(&self, phase: CrawlPhase);

    /// A page has been dispatched for rendering.
    fn report_page_started(&self, url: &str, depth: u32);

    /// A page rendered and `links` same-origin links were extracted from it,
    /// including ones already in the frontier.
    fn report_page_completed(&self, url: &str, links: usize);

    /// A non-fatal error was recorded.
    fn report_error(&self, url: &str, error: &str);

    /// The scheduler has stopped.
    fn report_completed(&self, stats: &CrawlStats);
}

/// Progress reporter that does nothing
///
/// All methods are no-ops and will be inlined away by the compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_phase(&self, _phase: CrawlPhase) {}

    #[inline(always)]
    fn report_page_started(&self, _url: &str, _depth: u32) {}

    #[inline(always)]
    fn report_page_completed(&self, _url: &str, _links: usize) {}

    #[inline(always)]
    fn report_error(&self, _url: &str, _error: &str) {}

    #[inline(always)]
    fn report_completed(&self, _stats: &CrawlStats) {}
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for &P {
    fn report_phase(&self, phase: CrawlPhase) {
        (**self).report_phase(phase);
    }

    fn report_page_started(&self, url: &str, depth: u32) {
        (**self).report_page_started(url, depth);
    }

    fn report_page_completed(&self, url: &str, links: usize) {
        (**self).report_page_completed(url, links);
    }

    fn report_error(&self, url: &str, error: &str) {
        (**self).report_error(url, error);
    }

    fn report_completed(&self, stats: &CrawlStats) {
        (**self).report_completed(stats);
    }
}
