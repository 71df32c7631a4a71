//! End-to-end crawl sessions against a mock site, rendered without a browser

use mockito::{Mock, Server};
use std::sync::Mutex;

use sitescout::crawl_engine::{CrawlPhase, CrawlStats, ProgressReporter};
use sitescout::utils::constants::MAX_CRAWL_DELAY_SECS;
use sitescout::{CrawlConfig, CrawlError, ErrorKind};

mod common;
use common::*;

/// robots.txt without sitemaps plus an empty sitemap, so discovery adds nothing.
async fn mount_quiet_discovery(server: &mut Server) -> Vec<Mock> {
    vec![
        create_body_mock(server, "/robots.txt", 200, "User-agent: *\nDisallow: /private\n").await,
        create_body_mock(server, "/sitemap.xml", 200, urlset(&[])).await,
    ]
}

fn config_with(f: impl FnOnce(sitescout::CrawlConfigBuilder) -> sitescout::CrawlConfigBuilder) -> CrawlConfig {
    let base = CrawlConfig::builder()
        .crawl_delay(0.0)
        .navigation_timeout(std::time::Duration::from_secs(5));
    f(base).build().expect("valid test config")
}

#[tokio::test]
async fn test_crawl_follows_links_breadth_first() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let mut mocks = mount_quiet_discovery(&mut server).await;
    mocks.push(create_html_mock(&mut server, "/", &create_linked_html("Home", &["/a", "/b"])).await);
    mocks.push(create_html_mock(&mut server, "/a", &create_linked_html("A", &["/a/deep", "/"])).await);
    mocks.push(create_html_mock(&mut server, "/b", &create_linked_html("B", &["https://elsewhere.test/"])).await);
    mocks.push(create_html_mock(&mut server, "/a/deep", &create_linked_html("Deep", &[])).await);

    let result = static_session(fast_config())
        .run(&format!("{base}/"))
        .await
        .expect("crawl should run");

    assert_eq!(
        result.discovered_urls,
        vec![
            format!("{base}/"),
            format!("{base}/a"),
            format!("{base}/b"),
            format!("{base}/a/deep"),
        ]
    );
    assert_eq!(result.pages.len(), 4);
    assert_eq!(result.pages.last().map(|p| p.url.clone()), Some(format!("{base}/a/deep")));
    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    assert_eq!(result.stats.pages_rendered, 4);
    assert_eq!(result.stats.pages_failed, 0);

    let home = result.pages.iter().find(|p| p.url == format!("{base}/")).unwrap();
    assert_eq!(home.title, "Home");
    assert_eq!(home.links, vec![format!("{base}/a"), format!("{base}/b")]);

    let robots = result.robots_data.expect("robots.txt was served");
    assert_eq!(robots.disallowed, vec!["/private"]);
    assert_eq!(result.sitemap_urls, vec![format!("{base}/sitemap.xml")]);
}

#[tokio::test]
async fn test_page_budget_is_respected() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let mut mocks = mount_quiet_discovery(&mut server).await;

    let links: Vec<String> = (0..10).map(|i| format!("/p{i}")).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    mocks.push(create_html_mock(&mut server, "/", &create_linked_html("Hub", &link_refs)).await);
    for link in &links {
        mocks.push(create_html_mock(&mut server, link, &create_linked_html(link, &[])).await);
    }

    let config = config_with(|b| b.max_pages(3).parallel_workers(2));
    let result = static_session(config).run(&format!("{base}/")).await.unwrap();

    assert_eq!(result.pages.len(), 3);
    assert_eq!(result.stats.pages_rendered, 3);
    assert_eq!(result.discovered_urls.len(), 11);
}

#[tokio::test]
async fn test_max_depth_stops_descent() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let mut mocks = mount_quiet_discovery(&mut server).await;
    mocks.push(create_html_mock(&mut server, "/", &create_linked_html("Root", &["/one"])).await);
    mocks.push(create_html_mock(&mut server, "/one", &create_linked_html("One", &["/two"])).await);
    let never = server
        .mock("GET", "/two")
        .with_status(200)
        .with_body(create_linked_html("Two", &[]))
        .expect(0)
        .create_async()
        .await;

    let config = config_with(|b| b.max_depth(1));
    let result = static_session(config).run(&format!("{base}/")).await.unwrap();

    let rendered: Vec<&str> = result.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(rendered, vec![format!("{base}/"), format!("{base}/one")]);
    assert!(result.discovered_urls.contains(&format!("{base}/two")));
    never.assert_async().await;
}

#[tokio::test]
async fn test_sitemap_pages_are_seeded_at_depth_zero() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _robots = create_body_mock(
        &mut server,
        "/robots.txt",
        200,
        format!("Sitemap: {base}/map.xml\n"),
    )
    .await;
    let _map = create_body_mock(&mut server, "/map.xml", 200, urlset(&[&format!("{base}/landing")])).await;
    let _root = create_html_mock(&mut server, "/", &create_linked_html("Root", &["/child"])).await;
    let _landing = create_html_mock(&mut server, "/landing", &create_linked_html("Landing", &[])).await;

    let config = config_with(|b| b.max_depth(0));
    let result = static_session(config).run(&format!("{base}/")).await.unwrap();

    let rendered: Vec<&str> = result.pages.iter().map(|p| p.url.as_str()).collect();
    assert!(rendered.contains(&format!("{base}/landing").as_str()));
    assert!(!rendered.contains(&format!("{base}/child").as_str()));
    assert_eq!(result.sitemap_urls, vec![format!("{base}/map.xml")]);
}

#[tokio::test]
async fn test_failed_pages_are_recorded_once() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let mut mocks = mount_quiet_discovery(&mut server).await;
    mocks.push(
        create_html_mock(&mut server, "/", &create_linked_html("Root", &["/missing", "/ok"])).await,
    );
    mocks.push(
        create_html_mock(&mut server, "/ok", &create_linked_html("Ok", &["/missing", "/"])).await,
    );
    let missing = server
        .mock("GET", "/missing")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let result = static_session(fast_config()).run(&format!("{base}/")).await.unwrap();

    assert_eq!(result.pages.len(), 2);
    let crawl_errors: Vec<_> = result.errors_of(ErrorKind::CrawlError).collect();
    assert_eq!(crawl_errors.len(), 1);
    assert_eq!(crawl_errors[0].url, format!("{base}/missing"));
    assert_eq!(result.stats.pages_failed, 1);
    missing.assert_async().await;
}

#[tokio::test]
async fn test_each_page_is_rendered_once() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _discovery = mount_quiet_discovery(&mut server).await;
    let root = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(create_linked_html("Root", &["/x", "/y", "/", "/#again"]))
        .expect(1)
        .create_async()
        .await;
    let x = server
        .mock("GET", "/x")
        .with_status(200)
        .with_body(create_linked_html("X", &["/y", "/", "/x"]))
        .expect(1)
        .create_async()
        .await;
    let y = server
        .mock("GET", "/y")
        .with_status(200)
        .with_body(create_linked_html("Y", &["/x", "/"]))
        .expect(1)
        .create_async()
        .await;

    let config = config_with(|b| b.parallel_workers(3));
    let result = static_session(config).run(&format!("{base}/")).await.unwrap();

    assert_eq!(result.pages.len(), 3);
    assert_eq!(result.discovered_urls.len(), 3);
    root.assert_async().await;
    x.assert_async().await;
    y.assert_async().await;
}

#[tokio::test]
async fn test_discovery_failures_do_not_stop_the_crawl() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _robots = create_error_mock(&mut server, "/robots.txt", 500).await;
    let _sitemap = create_body_mock(&mut server, "/sitemap.xml", 200, "<urlset><url>").await;
    let _root = create_html_mock(&mut server, "/", &create_linked_html("Root", &[])).await;

    let result = static_session(fast_config()).run(&format!("{base}/")).await.unwrap();

    assert!(result.robots_data.is_none());
    assert_eq!(result.errors_of(ErrorKind::RobotsParseError).count(), 1);
    assert_eq!(result.errors_of(ErrorKind::SitemapParseError).count(), 1);
    assert_eq!(result.pages.len(), 1);
}

#[tokio::test]
async fn test_robots_crawl_delay_is_applied_between_batches() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _robots = create_body_mock(&mut server, "/robots.txt", 200, "Crawl-delay: 1\n").await;
    let _sitemap = create_body_mock(&mut server, "/sitemap.xml", 200, urlset(&[])).await;
    let _root = create_html_mock(&mut server, "/", &create_linked_html("Root", &["/next"])).await;
    let _next = create_html_mock(&mut server, "/next", &create_linked_html("Next", &[])).await;

    let config = config_with(|b| b.parallel_workers(1));
    let result = static_session(config).run(&format!("{base}/")).await.unwrap();

    assert_eq!(result.robots_data.and_then(|r| r.crawl_delay), Some(1.0));
    assert_eq!(result.stats.batches, 2);
    assert!(result.stats.elapsed_ms >= 1000, "elapsed {}ms", result.stats.elapsed_ms);
}

#[tokio::test]
async fn test_oversized_robots_crawl_delay_is_clamped() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _robots = create_body_mock(&mut server, "/robots.txt", 200, "Crawl-delay: 1e20\n").await;
    let _sitemap = create_body_mock(&mut server, "/sitemap.xml", 200, urlset(&[])).await;
    let _root = create_html_mock(&mut server, "/", &create_linked_html("Root", &["/next"])).await;
    let _next = create_html_mock(&mut server, "/next", &create_linked_html("Next", &[])).await;

    // One page: the crawl ends before any inter-batch sleep.
    let config = config_with(|b| b.max_pages(1));
    let result = static_session(config).run(&format!("{base}/")).await.unwrap();

    assert_eq!(
        result.robots_data.and_then(|r| r.crawl_delay),
        Some(MAX_CRAWL_DELAY_SECS)
    );
    assert_eq!(result.pages.len(), 1);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_aggressive_mode_seeds_probed_paths() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _discovery = mount_quiet_discovery(&mut server).await;
    let _root = create_html_mock(&mut server, "/", &create_linked_html("Root", &[])).await;
    let _probe = create_head_mock(&mut server, "/contact", 200).await;
    let _contact = create_html_mock(&mut server, "/contact", &create_linked_html("Contact", &[])).await;

    let config = config_with(|b| b.aggressive_mode(true));
    let result = static_session(config).run(&format!("{base}/")).await.unwrap();

    let rendered: Vec<&str> = result.pages.iter().map(|p| p.url.as_str()).collect();
    assert!(rendered.contains(&format!("{base}/contact").as_str()));
    assert!(result.detected_cms.is_empty());
}

#[derive(Default)]
struct RecordingProgress {
    phases: Mutex<Vec<CrawlPhase>>,
    completed: Mutex<Option<CrawlStats>>,
}

impl ProgressReporter for RecordingProgress {
    fn report_phase(&self, phase: CrawlPhase) {
        self.phases.lock().unwrap().push(phase);
    }

    fn report_page_started(&self, _url: &str, _depth: u32) {}

    fn report_page_completed(&self, _url: &str, _links: usize) {}

    fn report_error(&self, _url: &str, _error: &str) {}

    fn report_completed(&self, stats: &CrawlStats) {
        *self.completed.lock().unwrap() = Some(stats.clone());
    }
}

#[tokio::test]
async fn test_progress_sees_every_phase() {
    let mut server = setup_mock_server().await;
    let base = server.url();
    let _discovery = mount_quiet_discovery(&mut server).await;
    let _root = create_html_mock(&mut server, "/", &create_linked_html("Root", &[])).await;

    let progress = RecordingProgress::default();
    let result = static_session(fast_config())
        .with_progress(&progress)
        .run(&format!("{base}/"))
        .await
        .unwrap();

    assert_eq!(
        *progress.phases.lock().unwrap(),
        vec![CrawlPhase::Robots, CrawlPhase::Sitemaps, CrawlPhase::Crawling]
    );
    assert_eq!(progress.completed.lock().unwrap().as_ref(), Some(&result.stats));
}

#[tokio::test]
async fn test_invalid_start_url_is_fatal() {
    let session = static_session(fast_config());

    for bad in ["not a url", "ftp://example.com/", "mailto:someone@example.com"] {
        let err = session.run(bad).await.unwrap_err();
        assert!(matches!(err, CrawlError::InvalidStartUrl { .. }), "{bad}: {err}");
    }
}
