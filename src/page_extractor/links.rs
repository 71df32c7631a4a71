//! Multi-strategy link extraction over a [`DomSnapshot`].
//!
//! Seven independent strategies each turn one captured input into absolute
//! URLs. Their outputs are unioned in strategy order (first occurrence
//! wins), then filtered to the crawl origin. A strategy whose input could
//! not be captured reports a [`StrategyFailure`] and contributes nothing;
//! the others are unaffected.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use url::{Origin, Url};

use super::snapshot::DomSnapshot;
use crate::utils::constants::{MAX_CSS_RULES, MAX_INLINE_SCRIPTS, MAX_SCRIPT_CHARS};
use crate::utils::url_utils::{resolve_url, same_origin};

/// Data attributes that commonly carry navigation targets.
pub const DATA_URL_ATTRIBUTES: &[&str] = &[
    "data-href",
    "data-url",
    "data-link",
    "data-src",
    "data-page",
    "data-target",
    "data-action",
    "data-route",
];

/// Selectors for pagination UI conventions, tried one by one.
pub const PAGINATION_SELECTORS: &[&str] = &[
    ".pagination a[href]",
    ".pager a[href]",
    "[class*='pagination'] a[href]",
    "[class*='paging'] a[href]",
    "nav[aria-label*='pagination'] a[href]",
    ".page-numbers a[href]",
    "[rel='next']",
    "[rel='prev']",
    "a[aria-label*='page']",
    "a[aria-label*='next']",
    "a[aria-label*='previous']",
];

static ONCLICK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"window\.location\s*=\s*['"]([^'"]+)['"]"#,
        r#"location\.href\s*=\s*['"]([^'"]+)['"]"#,
        r#"window\.open\(['"]([^'"]+)['"]"#,
        r#"navigate\(['"]([^'"]+)['"]"#,
        r#"goto\(['"]([^'"]+)['"]"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid onclick navigation regex"))
    .collect()
});

static CSS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).expect("Invalid CSS url() regex")
});

static ROUTE_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["'](/[/\w-]+)["']"#).expect("Invalid route literal regex"));

static PATH_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w\-/]+(\.(html?|php|aspx?|jsp))?$").expect("Invalid path token regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStrategy {
    Anchors,
    InlineHandlers,
    DataAttributes,
    Srcset,
    CssBackgrounds,
    Pagination,
    RouterState,
}

impl LinkStrategy {
    pub const ALL: [Self; 7] = [
        Self::Anchors,
        Self::InlineHandlers,
        Self::DataAttributes,
        Self::Srcset,
        Self::CssBackgrounds,
        Self::Pagination,
        Self::RouterState,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anchors => "anchors",
            Self::InlineHandlers => "inline_handlers",
            Self::DataAttributes => "data_attributes",
            Self::Srcset => "srcset",
            Self::CssBackgrounds => "css_backgrounds",
            Self::Pagination => "pagination",
            Self::RouterState => "router_state",
        }
    }

    /// Run this strategy against a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StrategyFailure`] when the strategy's input was not captured.
    pub fn extract(self, snapshot: &DomSnapshot) -> Result<Vec<Url>, StrategyFailure> {
        match self {
            Self::Anchors => anchor_links(snapshot),
            Self::InlineHandlers => inline_handler_links(snapshot),
            Self::DataAttributes => data_attribute_links(snapshot),
            Self::Srcset => srcset_links(snapshot),
            Self::CssBackgrounds => css_background_links(snapshot),
            Self::Pagination => pagination_links(snapshot),
            Self::RouterState => router_links(snapshot),
        }
    }
}

impl fmt::Display for LinkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy that produced nothing because its input was unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyFailure {
    pub strategy: LinkStrategy,
    pub reason: String,
}

impl StrategyFailure {
    fn new(strategy: LinkStrategy, reason: impl Into<String>) -> Self {
        Self {
            strategy,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} strategy failed: {}", self.strategy, self.reason)
    }
}

/// Same-origin links of a page plus the strategies that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Unique absolute URLs in strategy order, then document order.
    pub urls: Vec<String>,
    pub failures: Vec<StrategyFailure>,
}

/// Run all seven strategies and keep the links that share `origin`.
#[must_use]
pub fn extract_links(snapshot: &DomSnapshot, origin: &Origin) -> LinkReport {
    let mut report = LinkReport::default();
    let mut seen = HashSet::new();

    for strategy in LinkStrategy::ALL {
        match strategy.extract(snapshot) {
            Ok(urls) => {
                for url in urls {
                    if same_origin(&url, origin) && seen.insert(url.as_str().to_owned()) {
                        report.urls.push(url.into());
                    }
                }
            }
            Err(failure) => {
                debug!(
                    target: "sitescout::links",
                    "{failure} on {}", snapshot.page_url
                );
                report.failures.push(failure);
            }
        }
    }

    report
}

/// Heuristic for data attribute values: does this look like a link target?
#[must_use]
pub fn looks_like_url(value: &str) -> bool {
    if value.is_empty() || starts_with_any(value, &["#", "javascript:", "mailto:", "tel:", "data:"]) {
        return false;
    }
    if starts_with_any(value, &["/", "http://", "https://", "./"]) {
        return true;
    }
    PATH_TOKEN.is_match(value)
}

/// `url(...)` tokens in a CSS value, excluding `data:` URIs.
#[must_use]
pub fn extract_css_urls(value: &str) -> Vec<String> {
    CSS_URL
        .captures_iter(value)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|url| !url.is_empty() && !starts_with_any(url, &["data:"]))
        .collect()
}

/// Root-relative path literals (`"/a/b"`, no dot) in script text.
#[must_use]
pub fn extract_route_literals(script: &str) -> Vec<String> {
    ROUTE_LITERAL
        .captures_iter(script)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn starts_with_any(value: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| {
        value
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

fn resolve_all<'a>(base: &Url, raw: impl IntoIterator<Item = &'a str>) -> Vec<Url> {
    raw.into_iter()
        .filter_map(|value| resolve_url(base, value))
        .collect()
}

fn anchor_links(snapshot: &DomSnapshot) -> Result<Vec<Url>, StrategyFailure> {
    let hrefs = snapshot
        .anchors
        .as_ref()
        .map_err(|reason| StrategyFailure::new(LinkStrategy::Anchors, reason))?;

    Ok(resolve_all(
        &snapshot.page_url,
        hrefs
            .iter()
            .map(|href| href.trim())
            .filter(|href| !starts_with_any(href, &["#", "javascript:", "mailto:", "tel:"])),
    ))
}

fn inline_handler_links(snapshot: &DomSnapshot) -> Result<Vec<Url>, StrategyFailure> {
    let handlers = snapshot
        .onclick_handlers
        .as_ref()
        .map_err(|reason| StrategyFailure::new(LinkStrategy::InlineHandlers, reason))?;

    let targets = handlers.iter().flat_map(|handler| {
        ONCLICK_PATTERNS
            .iter()
            .flat_map(move |re| re.captures_iter(handler))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
    });

    Ok(resolve_all(
        &snapshot.page_url,
        targets.filter(|target| !starts_with_any(target, &["javascript:", "#"])),
    ))
}

fn data_attribute_links(snapshot: &DomSnapshot) -> Result<Vec<Url>, StrategyFailure> {
    let pairs = snapshot
        .data_attributes
        .as_ref()
        .map_err(|reason| StrategyFailure::new(LinkStrategy::DataAttributes, reason))?;

    Ok(resolve_all(
        &snapshot.page_url,
        pairs
            .iter()
            .map(|(_, value)| value.as_str())
            .filter(|value| looks_like_url(value)),
    ))
}

fn srcset_links(snapshot: &DomSnapshot) -> Result<Vec<Url>, StrategyFailure> {
    let srcsets = snapshot
        .srcsets
        .as_ref()
        .map_err(|reason| StrategyFailure::new(LinkStrategy::Srcset, reason))?;

    // A data URI contains commas of its own; splitting it would yield junk paths.
    let candidates = srcsets
        .iter()
        .filter(|srcset| !starts_with_any(srcset.trim_start(), &["data:"]))
        .flat_map(|srcset| srcset.split(','))
        .filter_map(|segment| segment.split_whitespace().next());

    Ok(resolve_all(&snapshot.page_url, candidates))
}

fn css_background_links(snapshot: &DomSnapshot) -> Result<Vec<Url>, StrategyFailure> {
    let values = snapshot
        .css_backgrounds
        .as_ref()
        .map_err(|reason| StrategyFailure::new(LinkStrategy::CssBackgrounds, reason))?;

    let urls: Vec<String> = values
        .iter()
        .take(MAX_CSS_RULES)
        .flat_map(|value| extract_css_urls(value))
        .collect();

    Ok(resolve_all(&snapshot.page_url, urls.iter().map(String::as_str)))
}

fn pagination_links(snapshot: &DomSnapshot) -> Result<Vec<Url>, StrategyFailure> {
    let mut urls = Vec::new();
    let mut failed = 0;

    for (selector, capture) in &snapshot.pagination {
        match capture {
            Ok(hrefs) => urls.extend(resolve_all(
                &snapshot.page_url,
                hrefs
                    .iter()
                    .map(|href| href.trim())
                    .filter(|href| !starts_with_any(href, &["#", "javascript:"])),
            )),
            Err(reason) => {
                debug!(target: "sitescout::links", "Pagination selector {selector} failed: {reason}");
                failed += 1;
            }
        }
    }

    if failed > 0 && failed == snapshot.pagination.len() {
        return Err(StrategyFailure::new(
            LinkStrategy::Pagination,
            format!("all {failed} pagination selectors failed"),
        ));
    }
    Ok(urls)
}

fn router_links(snapshot: &DomSnapshot) -> Result<Vec<Url>, StrategyFailure> {
    let probe = snapshot
        .router
        .as_ref()
        .map_err(|reason| StrategyFailure::new(LinkStrategy::RouterState, reason))?;

    let script_routes: Vec<String> = probe
        .inline_scripts
        .iter()
        .take(MAX_INLINE_SCRIPTS)
        .filter(|script| script.chars().count() <= MAX_SCRIPT_CHARS)
        .flat_map(|script| extract_route_literals(script))
        .collect();

    let paths = probe
        .routes
        .iter()
        .map(String::as_str)
        .chain(script_routes.iter().map(String::as_str))
        .filter(|path| path.starts_with('/'));

    Ok(resolve_all(&snapshot.page_url, paths))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_patterns_compile() {
        assert_eq!(ONCLICK_PATTERNS.len(), 5);
        assert!(CSS_URL.is_match("url(/bg.png)"));
        assert!(ROUTE_LITERAL.is_match(r#"push("/docs")"#));
        assert!(PATH_TOKEN.is_match("about.html"));
    }

    #[test]
    fn css_urls_handle_quotes_and_skip_data_uris() {
        let value = r#"url("/img/a.png"), url('b.jpg'), url(data:image/png;base64,xyz), url( c.gif )"#;
        assert_eq!(extract_css_urls(value), vec!["/img/a.png", "b.jpg", "c.gif"]);
    }

    #[test]
    fn route_literals_exclude_dotted_paths() {
        let script = r#"const a = "/products/list"; const b = '/static/app.js'; go('/about')"#;
        assert_eq!(extract_route_literals(script), vec!["/products/list", "/about"]);
    }

    #[test]
    fn prefix_checks_are_case_insensitive() {
        assert!(!looks_like_url("JavaScript:void(0)"));
        assert!(!looks_like_url("MAILTO:x@example.com"));
    }

    #[test]
    fn path_tokens_are_accepted() {
        assert!(looks_like_url("products/42"));
        assert!(looks_like_url("about.html"));
        assert!(looks_like_url("index.php"));
        assert!(!looks_like_url("some value with spaces"));
        assert!(!looks_like_url("image.png"));
    }
}
