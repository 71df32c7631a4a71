//! Configuration module for crawl sessions
//!
//! This module provides the `CrawlConfig` struct and its builder for
//! configuring a crawl with validation and sensible defaults.

pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

pub use builder::CrawlConfigBuilder;
pub use types::{ConfigError, CrawlConfig};
