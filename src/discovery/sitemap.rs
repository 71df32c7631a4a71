//! Sitemap resolution.
//!
//! Walks a work queue of sitemap URLs, following `sitemapindex` documents to
//! their children until the queue is exhausted. Each sitemap URL is fetched
//! and parsed at most once, so indexes that reference each other (or
//! themselves) terminate.
//!
//! Documents are matched in the sitemap namespace first; when that yields
//! nothing the same shapes are matched on elements that carry no namespace,
//! which covers sitemaps that omit the `xmlns` declaration.

use flate2::read::GzDecoder;
use log::{debug, info, warn};
use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use std::collections::{HashSet, VecDeque};
use std::io::Read;
use std::time::Duration;

use crate::crawl_engine::crawl_types::{ErrorEntry, ErrorKind};
use crate::discovery::robots::RobotsDirectives;
use crate::fetcher::HttpFetcher;
use crate::utils::constants::SITEMAP_NAMESPACE;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Locations found in one sitemap document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// `urlset/url/loc` values.
    pub page_urls: Vec<String>,
    /// `sitemapindex/sitemap/loc` values.
    pub child_sitemaps: Vec<String>,
}

impl SitemapDocument {
    fn is_empty(&self) -> bool {
        self.page_urls.is_empty() && self.child_sitemaps.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SitemapParseError {
    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("document ended with {0} unclosed element(s)")]
    Truncated(usize),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum NsKind {
    Sitemap,
    Unbound,
    Other,
}

fn classify(ns: &ResolveResult<'_>) -> NsKind {
    match ns {
        ResolveResult::Bound(Namespace(uri)) if *uri == SITEMAP_NAMESPACE.as_bytes() => {
            NsKind::Sitemap
        }
        ResolveResult::Unbound => NsKind::Unbound,
        _ => NsKind::Other,
    }
}

/// Pop the innermost element; a closing `loc` under `url` or `sitemap` is
/// recorded in the bucket matching its namespace.
fn close_element(
    open: &mut Vec<(String, NsKind)>,
    loc_text: &mut Option<String>,
    namespaced: &mut SitemapDocument,
    plain: &mut SitemapDocument,
) {
    let Some((local, loc_ns)) = open.pop() else {
        return;
    };
    if local != "loc" {
        return;
    }
    let (Some(text), Some((parent, parent_ns))) = (loc_text.take(), open.last()) else {
        return;
    };
    let target = match (loc_ns, *parent_ns) {
        (NsKind::Sitemap, NsKind::Sitemap) => namespaced,
        (NsKind::Unbound, NsKind::Unbound) => plain,
        _ => return,
    };
    let location = text.trim();
    if location.is_empty() {
        return;
    }
    match parent.as_str() {
        "url" => target.page_urls.push(location.to_string()),
        "sitemap" => target.child_sitemaps.push(location.to_string()),
        _ => {}
    }
}

/// Parse one sitemap document (already decompressed).
///
/// # Errors
///
/// Fails when the reader reports malformed XML, when there is no root
/// element, or when the input ends with elements still open.
pub fn parse_sitemap_document(bytes: &[u8]) -> Result<SitemapDocument, SitemapParseError> {
    let mut reader = NsReader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut open: Vec<(String, NsKind)> = Vec::new();
    let mut saw_root = false;
    let mut loc_text: Option<String> = None;
    let mut namespaced = SitemapDocument::default();
    let mut plain = SitemapDocument::default();

    loop {
        let (ns, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(pair) => pair,
            Err(e) => return Err(SitemapParseError::Xml(e.to_string())),
        };
        let ns_kind = classify(&ns);

        match event {
            Event::Start(start) => {
                saw_root = true;
                let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                if local == "loc" {
                    loc_text = Some(String::new());
                }
                open.push((local, ns_kind));
            }
            Event::Empty(_) => saw_root = true,
            Event::Text(text) => {
                if let Some(loc) = loc_text.as_mut() {
                    let unescaped = text
                        .unescape()
                        .map_err(|e| SitemapParseError::Xml(e.to_string()))?;
                    loc.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(loc) = loc_text.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => close_element(&mut open, &mut loc_text, &mut namespaced, &mut plain),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(SitemapParseError::NoRoot);
    }
    if !open.is_empty() {
        return Err(SitemapParseError::Truncated(open.len()));
    }

    if namespaced.is_empty() {
        Ok(plain)
    } else {
        Ok(namespaced)
    }
}

/// Decompress a gzip body.
pub fn decompress_gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Initial sitemap URLs: those published in robots.txt, or `{origin}/sitemap.xml`.
#[must_use]
pub fn seed_sitemaps(robots: Option<&RobotsDirectives>, origin: &str) -> Vec<String> {
    match robots {
        Some(directives) if !directives.sitemaps.is_empty() => directives.sitemaps.clone(),
        _ => vec![format!("{origin}/sitemap.xml")],
    }
}

/// Outcome of resolving a set of sitemap seeds.
#[derive(Debug, Clone, Default)]
pub struct SitemapResolution {
    /// Page URLs, unique, in discovery order.
    pub page_urls: Vec<String>,
    /// Every sitemap URL seeded or referenced, unique, in discovery order.
    pub sitemap_urls: Vec<String>,
    pub errors: Vec<ErrorEntry>,
}

enum LoadFailure {
    /// Recorded as a `sitemap_parse_error`.
    Recorded(String),
    /// Logged only; the sitemap contributes nothing.
    Skipped,
}

/// Work-queue traversal over sitemap documents.
pub struct SitemapResolver<'a, F> {
    fetcher: &'a F,
    timeout: Duration,
}

impl<'a, F: HttpFetcher> SitemapResolver<'a, F> {
    pub fn new(fetcher: &'a F, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    pub async fn resolve<I>(&self, seeds: I) -> SitemapResolution
    where
        I: IntoIterator<Item = String>,
    {
        let mut resolution = SitemapResolution::default();
        let mut known: HashSet<String> = HashSet::new();
        let mut processed: HashSet<String> = HashSet::new();
        let mut pages_seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();

        for seed in seeds {
            if known.insert(seed.clone()) {
                resolution.sitemap_urls.push(seed.clone());
                queue.push_back(seed);
            }
        }

        while let Some(sitemap_url) = queue.pop_front() {
            if !processed.insert(sitemap_url.clone()) {
                continue;
            }

            let document = match self.load(&sitemap_url).await {
                Ok(document) => document,
                Err(LoadFailure::Recorded(message)) => {
                    warn!(target: "sitescout::sitemap", "Sitemap {sitemap_url} failed: {message}");
                    resolution.errors.push(ErrorEntry::new(
                        &sitemap_url,
                        message,
                        ErrorKind::SitemapParseError,
                    ));
                    continue;
                }
                Err(LoadFailure::Skipped) => continue,
            };

            debug!(
                target: "sitescout::sitemap",
                "{sitemap_url}: {} page(s), {} child sitemap(s)",
                document.page_urls.len(),
                document.child_sitemaps.len()
            );

            for page in document.page_urls {
                if pages_seen.insert(page.clone()) {
                    resolution.page_urls.push(page);
                }
            }
            for child in document.child_sitemaps {
                if known.insert(child.clone()) {
                    resolution.sitemap_urls.push(child.clone());
                    queue.push_back(child);
                }
            }
        }

        info!(
            target: "sitescout::sitemap",
            "Resolved {} page URL(s) from {} sitemap(s)",
            resolution.page_urls.len(),
            resolution.sitemap_urls.len()
        );
        resolution
    }

    async fn load(&self, sitemap_url: &str) -> Result<SitemapDocument, LoadFailure> {
        let response = self
            .fetcher
            .get(sitemap_url, self.timeout)
            .await
            .map_err(|e| LoadFailure::Recorded(e.to_string()))?;

        if response.status != 200 {
            return Err(LoadFailure::Recorded(format!("HTTP {}", response.status)));
        }

        let gzipped = sitemap_url.ends_with(".gz") || response.body.starts_with(&GZIP_MAGIC);
        let body = if gzipped {
            match decompress_gzip(&response.body) {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        target: "sitescout::sitemap",
                        "Failed to decompress {sitemap_url}: {e}"
                    );
                    return Err(LoadFailure::Skipped);
                }
            }
        } else {
            response.body
        };

        parse_sitemap_document(&body).map_err(|e| LoadFailure::Recorded(e.to_string()))
    }
}
