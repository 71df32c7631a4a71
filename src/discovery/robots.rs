//! robots.txt parsing.
//!
//! Only `Sitemap` and `Crawl-delay` influence the crawl; `Allow` and
//! `Disallow` are recorded for the caller but never enforced.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::crawl_engine::crawl_types::{ErrorEntry, ErrorKind};
use crate::fetcher::HttpFetcher;
use crate::utils::constants::MAX_CRAWL_DELAY_SECS;

/// Directives extracted from a robots.txt document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotsDirectives {
    pub sitemaps: Vec<String>,
    pub allowed: Vec<String>,
    pub disallowed: Vec<String>,
    /// Seconds; unset when absent or unparsable.
    pub crawl_delay: Option<f64>,
}

impl RobotsDirectives {
    /// Parse robots.txt text. Malformed content never fails the parse.
    ///
    /// Directive names are matched case-insensitively regardless of the
    /// user-agent group they appear in.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut directives = Self::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match name.trim().to_ascii_lowercase().as_str() {
                "sitemap" => directives.sitemaps.push(value.to_string()),
                "allow" => directives.allowed.push(value.to_string()),
                "disallow" => directives.disallowed.push(value.to_string()),
                "crawl-delay" => match value.parse::<f64>() {
                    Ok(delay) if delay.is_finite() && delay >= 0.0 => {
                        if delay > MAX_CRAWL_DELAY_SECS {
                            debug!(target: "sitescout::robots", "Clamping crawl-delay {value} to {MAX_CRAWL_DELAY_SECS}s");
                        }
                        directives.crawl_delay = Some(delay.min(MAX_CRAWL_DELAY_SECS));
                    }
                    _ => debug!(target: "sitescout::robots", "Ignoring crawl-delay value {value:?}"),
                },
                _ => {}
            }
        }

        directives
    }
}

/// Fetch and parse `{origin}/robots.txt`.
///
/// A transport failure or non-200 status is returned as a
/// `robots_parse_error` entry so the session can log it and carry on.
pub async fn fetch_robots<F: HttpFetcher>(
    fetcher: &F,
    origin: &str,
    timeout: Duration,
) -> Result<RobotsDirectives, ErrorEntry> {
    let robots_url = format!("{origin}/robots.txt");

    let response = fetcher.get(&robots_url, timeout).await.map_err(|e| {
        warn!(target: "sitescout::robots", "Failed to fetch {robots_url}: {e}");
        ErrorEntry::new(&robots_url, e.to_string(), ErrorKind::RobotsParseError)
    })?;

    if response.status != 200 {
        warn!(
            target: "sitescout::robots",
            "robots.txt returned HTTP {} for {robots_url}", response.status
        );
        return Err(ErrorEntry::new(
            &robots_url,
            format!("HTTP {}", response.status),
            ErrorKind::RobotsParseError,
        ));
    }

    let text = String::from_utf8_lossy(&response.body);
    let directives = RobotsDirectives::parse(&text);
    info!(
        target: "sitescout::robots",
        "Parsed robots.txt: {} sitemap(s), crawl-delay {:?}",
        directives.sitemaps.len(),
        directives.crawl_delay
    );
    Ok(directives)
}
