//! Best-effort existence probing of well-known and CMS signature paths.
//!
//! Every candidate gets one HEAD request; a final status of 200 confirms it
//! and the redirected URL (not the probed path) is kept. Failures of any kind
//! are dropped.

use futures::future::join_all;
use log::{debug, info};
use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use crate::fetcher::HttpFetcher;

/// Generic paths worth checking on any site.
pub const COMMON_PATHS: &[&str] = &[
    "/robots.txt",
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/sitemaps.xml",
    "/sitemap.xml.gz",
    "/api",
    "/admin",
    "/login",
    "/logout",
    "/register",
    "/signup",
    "/404",
    "/search",
    "/contact",
    "/about",
    "/faq",
    "/help",
    "/terms",
    "/privacy",
    "/blog",
    "/news",
    "/products",
    "/services",
    "/categories",
    "/tags",
    "/archive",
    "/feed",
    "/rss",
    "/atom.xml",
];

/// Signature paths per content management system.
pub const CMS_PATTERNS: &[(&str, &[&str])] = &[
    (
        "wordpress",
        &[
            "/wp-admin",
            "/wp-login.php",
            "/wp-content",
            "/wp-json/wp/v2/posts",
            "/wp-json/wp/v2/pages",
            "/xmlrpc.php",
            "/feed",
        ],
    ),
    (
        "shopify",
        &[
            "/admin",
            "/collections",
            "/products.json",
            "/cart",
            "/checkout",
            "/account/login",
            "/pages",
            "/blogs",
        ],
    ),
    (
        "drupal",
        &[
            "/admin",
            "/user/login",
            "/node",
            "/sites/default",
            "/admin/content",
        ],
    ),
    (
        "joomla",
        &["/administrator", "/components", "/modules", "/plugins"],
    ),
    (
        "magento",
        &[
            "/admin",
            "/customer/account/login",
            "/catalog/category",
            "/checkout",
        ],
    ),
];

/// Confirmed locations and the CMS families they point to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    /// Final URLs of confirmed candidates, unique, in catalog order.
    pub confirmed: Vec<String>,
    /// CMS names with at least one confirmed signature path.
    pub detected_cms: BTreeSet<String>,
}

/// Distinct candidate paths in catalog order: common paths first, then CMS paths.
#[must_use]
pub fn candidate_paths() -> Vec<&'static str> {
    let mut seen = HashSet::new();
    COMMON_PATHS
        .iter()
        .copied()
        .chain(CMS_PATTERNS.iter().flat_map(|(_, paths)| paths.iter().copied()))
        .filter(|path| seen.insert(*path))
        .collect()
}

fn cms_for_path(path: &str) -> impl Iterator<Item = &'static str> + '_ {
    CMS_PATTERNS
        .iter()
        .filter(move |(_, paths)| paths.iter().any(|candidate| *candidate == path))
        .map(|(name, _)| *name)
}

/// HEAD-probe every candidate path under `origin` concurrently.
pub async fn probe_paths<F: HttpFetcher>(fetcher: &F, origin: &str, timeout: Duration) -> ProbeReport {
    let candidates = candidate_paths();

    let checks = candidates.iter().map(|path| async move {
        let candidate = format!("{origin}{path}");
        match fetcher.head(&candidate, timeout).await {
            Ok(response) if response.status == 200 => Some((*path, response.final_url)),
            Ok(response) => {
                debug!(target: "sitescout::probe", "{candidate} -> HTTP {}", response.status);
                None
            }
            Err(e) => {
                debug!(target: "sitescout::probe", "{candidate} unreachable: {e}");
                None
            }
        }
    });

    let mut report = ProbeReport::default();
    let mut seen = HashSet::new();

    for (path, final_url) in join_all(checks).await.into_iter().flatten() {
        for cms in cms_for_path(path) {
            info!(target: "sitescout::probe", "Detected {cms} CMS pattern: {path}");
            report.detected_cms.insert(cms.to_string());
        }
        if seen.insert(final_url.clone()) {
            report.confirmed.push(final_url);
        }
    }

    info!(
        target: "sitescout::probe",
        "Probe confirmed {} of {} candidate path(s)",
        report.confirmed.len(),
        candidates.len()
    );
    report
}
