//! Worker-pool bounds and context lifecycle, checked with an in-memory site
//!
//! The renderer here never touches the network: pages are served from a map
//! and every context open, close and overlap is counted.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use sitescout::crawl_engine::{CrawlPhase, CrawlStats, ProgressReporter};
use sitescout::fetcher::{FetchError, FetchResponse, HeadResponse, HttpFetcher};
use sitescout::renderer::{DetachedPage, PageHandle, PageRenderer, RenderError, StaticElement};
use sitescout::utils::constants::MAX_CRAWL_DELAY_SECS;
use sitescout::{CrawlConfig, CrawlSession, ErrorKind};

const BASE: &str = "https://site.test";

/// Serves only robots.txt; everything else is a 404.
struct RobotsOnlyFetcher {
    robots: String,
}

impl HttpFetcher for RobotsOnlyFetcher {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<FetchResponse, FetchError> {
        let (status, body) = if url.ends_with("/robots.txt") {
            (200, self.robots.clone().into_bytes())
        } else {
            (404, Vec::new())
        };
        Ok(FetchResponse {
            status,
            final_url: url.to_string(),
            body,
        })
    }

    async fn head(&self, url: &str, _timeout: Duration) -> Result<HeadResponse, FetchError> {
        Ok(HeadResponse {
            status: 404,
            final_url: url.to_string(),
        })
    }
}

#[derive(Default)]
struct ContextCounters {
    opened: Cell<usize>,
    closed: Cell<usize>,
    live: Cell<usize>,
    peak: Cell<usize>,
}

/// Renders pages from an in-memory map; unknown paths fail to navigate.
struct CountingRenderer {
    site: Rc<HashMap<String, String>>,
    counters: Rc<ContextCounters>,
}

impl PageRenderer for CountingRenderer {
    type Page = CountingPage;

    async fn new_isolated_context(&self, _user_agent: &str) -> Result<CountingPage, RenderError> {
        let c = &self.counters;
        c.opened.set(c.opened.get() + 1);
        c.live.set(c.live.get() + 1);
        c.peak.set(c.peak.get().max(c.live.get()));
        Ok(CountingPage {
            site: Rc::clone(&self.site),
            counters: Rc::clone(&self.counters),
            document: OnceCell::new(),
        })
    }
}

struct CountingPage {
    site: Rc<HashMap<String, String>>,
    counters: Rc<ContextCounters>,
    document: OnceCell<DetachedPage>,
}

impl CountingPage {
    fn loaded(&self) -> Result<&DetachedPage, RenderError> {
        self.document.get().ok_or(RenderError::NotLoaded)
    }
}

impl PageHandle for CountingPage {
    type Element = StaticElement;

    async fn navigate(
        &self,
        url: &str,
        _timeout: Duration,
        _wait_until_idle: bool,
    ) -> Result<(), RenderError> {
        // Keep the context open long enough for the rest of the batch to overlap.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let path = url.strip_prefix(BASE).unwrap_or(url);
        let html = self.site.get(path).ok_or_else(|| RenderError::Navigation {
            url: url.to_string(),
            message: "HTTP 500".to_string(),
        })?;
        let _ = self.document.set(DetachedPage::from_html(html, url));
        Ok(())
    }

    async fn query_selector(&self, selector: &str) -> Result<Option<StaticElement>, RenderError> {
        self.loaded()?.query_selector(selector).await
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<StaticElement>, RenderError> {
        self.loaded()?.query_selector_all(selector).await
    }

    async fn evaluate(&self, _script: &str) -> Result<serde_json::Value, RenderError> {
        Err(RenderError::Unsupported("script evaluation"))
    }

    async fn title(&self) -> Result<String, RenderError> {
        self.loaded()?.title().await
    }

    async fn current_url(&self) -> Result<String, RenderError> {
        self.loaded()?.current_url().await
    }

    async fn close(self) -> Result<(), RenderError> {
        let c = &self.counters;
        c.closed.set(c.closed.get() + 1);
        c.live.set(c.live.get() - 1);
        Ok(())
    }
}

#[derive(Default)]
struct CompletedLinks(RefCell<Vec<(String, usize)>>);

impl ProgressReporter for CompletedLinks {
    fn report_phase(&self, _phase: CrawlPhase) {}
    fn report_page_started(&self, _url: &str, _depth: u32) {}
    fn report_page_completed(&self, url: &str, links: usize) {
        self.0.borrow_mut().push((url.to_string(), links));
    }
    fn report_error(&self, _url: &str, _error: &str) {}
    fn report_completed(&self, _stats: &CrawlStats) {}
}

fn page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
        .collect();
    format!("<html><head><title>{title}</title></head><body>{anchors}</body></html>")
}

/// Root links to eight children; `/p3` and `/p6` are missing and fail.
fn site() -> HashMap<String, String> {
    let children = ["/p1", "/p2", "/p3", "/p4", "/p5", "/p6", "/p7", "/p8"];
    let mut site = HashMap::new();
    site.insert("/".to_string(), page("Root", &children));
    for child in ["/p1", "/p2", "/p4", "/p5", "/p7", "/p8"] {
        site.insert(child.to_string(), page(child, &["/", "/p1"]));
    }
    site
}

fn session(
    robots: &str,
    workers: usize,
) -> (
    CrawlSession<RobotsOnlyFetcher, CountingRenderer>,
    Rc<ContextCounters>,
) {
    let config = CrawlConfig::builder()
        .parallel_workers(workers)
        .crawl_delay(0.0)
        .navigation_timeout(Duration::from_secs(5))
        .build()
        .expect("valid test config");
    let counters = Rc::new(ContextCounters::default());
    let renderer = CountingRenderer {
        site: Rc::new(site()),
        counters: Rc::clone(&counters),
    };
    let fetcher = RobotsOnlyFetcher {
        robots: robots.to_string(),
    };
    let session = CrawlSession::new(config, fetcher, renderer).expect("valid session");
    (session, counters)
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_renders_never_exceed_workers() {
    let (session, counters) = session("User-agent: *\n", 3);

    let result = session.run(&format!("{BASE}/")).await.unwrap();

    assert_eq!(result.stats.batches, 4);
    assert_eq!(result.stats.pages_rendered, 7);
    assert_eq!(result.stats.pages_failed, 2);
    assert_eq!(result.errors_of(ErrorKind::CrawlError).count(), 2);
    assert_eq!(counters.peak.get(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_every_context_is_closed_once() {
    let (session, counters) = session("User-agent: *\n", 2);

    let result = session.run(&format!("{BASE}/")).await.unwrap();

    let attempted = result.stats.pages_rendered + result.stats.pages_failed;
    assert_eq!(attempted, 9);
    assert_eq!(counters.opened.get(), attempted);
    assert_eq!(counters.closed.get(), counters.opened.get());
    assert_eq!(counters.live.get(), 0);
    assert!(counters.peak.get() <= 2);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_crawl_delay_sleeps_at_the_cap() {
    let (session, counters) = session("Crawl-delay: 1e20\n", 4);
    let started = tokio::time::Instant::now();

    let result = session.run(&format!("{BASE}/")).await.unwrap();

    assert_eq!(
        result.robots_data.and_then(|r| r.crawl_delay),
        Some(MAX_CRAWL_DELAY_SECS)
    );
    // Batches: root, then 4 + 4 children; two sleeps between three batches.
    assert_eq!(result.stats.batches, 3);
    assert_eq!(result.stats.pages_rendered, 7);
    let slept = started.elapsed();
    assert!(slept >= Duration::from_secs_f64(2.0 * MAX_CRAWL_DELAY_SECS));
    assert!(slept < Duration::from_secs_f64(3.0 * MAX_CRAWL_DELAY_SECS));
    assert_eq!(counters.closed.get(), counters.opened.get());
}

#[tokio::test(start_paused = true)]
async fn test_completed_pages_report_all_extracted_links() {
    let (session, _counters) = session("User-agent: *\n", 3);
    let progress = CompletedLinks::default();

    session
        .with_progress(&progress)
        .run(&format!("{BASE}/"))
        .await
        .unwrap();

    let completed = progress.0.borrow();
    let root = completed
        .iter()
        .find(|(url, _)| url == &format!("{BASE}/"))
        .expect("root completed");
    assert_eq!(root.1, 8);
    // Children only link back to pages already in the frontier.
    let child = completed
        .iter()
        .find(|(url, _)| url == &format!("{BASE}/p2"))
        .expect("child completed");
    assert_eq!(child.1, 2);
}
