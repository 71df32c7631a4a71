//! Pre-crawl discovery: robots.txt, sitemap hierarchy and path probing.
//!
//! These phases seed the crawl frontier before any page is rendered.

pub mod probe;
pub mod robots;
pub mod sitemap;

pub use probe::{CMS_PATTERNS, COMMON_PATHS, ProbeReport, probe_paths};
pub use robots::{RobotsDirectives, fetch_robots};
pub use sitemap::{
    SitemapDocument, SitemapParseError, SitemapResolution, SitemapResolver,
    parse_sitemap_document, seed_sitemaps,
};
