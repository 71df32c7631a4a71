//! Test utilities and helper functions for the sitescout test suite

use mockito::{Mock, Server, ServerGuard};
use std::time::Duration;

use sitescout::{CrawlConfig, CrawlSession, ReqwestFetcher, StaticRenderer};

/// Creates a test HTML document with the given head extras and body
#[allow(dead_code)]
pub fn create_test_html(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    {head}
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// A page whose body is just anchors to `links`
#[allow(dead_code)]
pub fn create_linked_html(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
        .collect();
    create_test_html(title, "", &anchors)
}

/// Sets up a mock HTTP server
#[allow(dead_code)]
pub async fn setup_mock_server() -> ServerGuard {
    Server::new_async().await
}

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub async fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns a body with the given status
#[allow(dead_code)]
pub async fn create_body_mock(
    server: &mut Server,
    path: &str,
    status: usize,
    body: impl AsRef<[u8]>,
) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body(body)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns a redirect
#[allow(dead_code)]
pub async fn create_redirect_mock(server: &mut Server, from: &str, to: &str) -> Mock {
    server
        .mock("GET", from)
        .with_status(301)
        .with_header("location", to)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    create_body_mock(server, path, status, "Error").await
}

/// Creates a HEAD endpoint answering with `status`
#[allow(dead_code)]
pub async fn create_head_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("HEAD", path)
        .with_status(status)
        .create_async()
        .await
}

/// A sitemap `urlset` in the standard namespace
#[allow(dead_code)]
pub fn urlset(locs: &[&str]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{loc}</loc></url>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</urlset>"#
    )
}

/// A sitemap index in the standard namespace
#[allow(dead_code)]
pub fn sitemap_index(locs: &[&str]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<sitemap><loc>{loc}</loc></sitemap>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</sitemapindex>"#
    )
}

/// Config with no politeness delay and short timeouts
#[allow(dead_code)]
pub fn fast_config() -> CrawlConfig {
    CrawlConfig::builder()
        .crawl_delay(0.0)
        .navigation_timeout(Duration::from_secs(5))
        .probe_timeout(Duration::from_secs(2))
        .sitemap_timeout(Duration::from_secs(5))
        .robots_timeout(Duration::from_secs(5))
        .build()
        .expect("valid test config")
}

/// A session that fetches pages over HTTP instead of a browser
#[allow(dead_code)]
pub fn static_session(
    config: CrawlConfig,
) -> CrawlSession<ReqwestFetcher, StaticRenderer<ReqwestFetcher>> {
    let fetcher = ReqwestFetcher::new(config.user_agent()).expect("http client");
    let renderer = StaticRenderer::new(fetcher.clone());
    CrawlSession::new(config, fetcher, renderer).expect("valid session")
}

/// A fetcher with the default test user agent
#[allow(dead_code)]
pub fn test_fetcher() -> ReqwestFetcher {
    ReqwestFetcher::new("SiteScoutTest/1.0").expect("http client")
}
