//! Core types shared by the crawl engine.
//!
//! Contains the fatal session error, the soft error log entries, the
//! frontier work item and the final result aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ConfigError;
use crate::discovery::RobotsDirectives;
use crate::page_extractor::schema::PageMetadata;

/// Errors that abort a session before any page is crawled.
///
/// Everything after session start degrades into [`ErrorEntry`] records instead.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("invalid start URL {url}: {reason}")]
    InvalidStartUrl { url: String, reason: String },

    #[error("browser error: {0}")]
    Browser(String),
}

/// Category of a non-fatal failure recorded in [`CrawlResult::errors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// robots.txt could not be fetched.
    RobotsParseError,
    /// One sitemap document could not be fetched or parsed.
    SitemapParseError,
    /// One page failed to render or extract.
    CrawlError,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RobotsParseError => "robots_parse_error",
            Self::SitemapParseError => "sitemap_parse_error",
            Self::CrawlError => "crawl_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One soft failure: the resource, what went wrong and its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub url: String,
    pub message: String,
    pub kind: ErrorKind,
}

impl ErrorEntry {
    pub fn new(url: impl Into<String>, message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
            kind,
        }
    }
}

/// A URL popped from the frontier together with its first-seen depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlQueue {
    pub url: String,
    pub depth: u32,
}

/// Counters collected while the scheduler runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub pages_rendered: usize,
    pub pages_failed: usize,
    pub batches: usize,
    pub elapsed_ms: u64,
}

/// Terminal aggregate returned by a crawl session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    /// Rendered pages in completion order.
    pub pages: Vec<PageMetadata>,
    /// Every URL ever placed in the frontier, unique, in first-seen order.
    pub discovered_urls: Vec<String>,
    /// Every sitemap URL fetched or referenced, unique, in first-seen order.
    pub sitemap_urls: Vec<String>,
    pub errors: Vec<ErrorEntry>,
    pub robots_data: Option<RobotsDirectives>,
    /// CMS names whose signature paths answered during probing.
    pub detected_cms: Vec<String>,
    pub stats: CrawlStats,
}

impl CrawlResult {
    /// Errors of a single kind, in the order they were recorded.
    pub fn errors_of(&self, kind: ErrorKind) -> impl Iterator<Item = &ErrorEntry> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}
