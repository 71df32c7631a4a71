//! Page data extraction.
//!
//! Metadata is read through DOM queries on a live page. Links are extracted
//! in two steps: a [`DomSnapshot`] captures the raw inputs from the page,
//! then pure strategy functions turn the snapshot into URLs.

pub mod js_scripts;
pub mod links;
pub mod metadata;
pub mod schema;
pub mod snapshot;

pub use links::{LinkReport, LinkStrategy, StrategyFailure, extract_links, looks_like_url};
pub use metadata::extract_metadata;
pub use schema::{ImageInfo, PageMetadata, RouterProbe};
pub use snapshot::{Capture, DomSnapshot};
