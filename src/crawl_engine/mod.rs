//! Crawl Engine Module
//!
//! This module contains the frontier bookkeeping, the batch scheduler that
//! renders pages concurrently, and the session facade that runs discovery
//! before handing seeds to the scheduler.

// Sub-modules
pub mod cleanup;
pub mod crawl_types;
pub mod frontier;
pub mod orchestrator;
pub mod page_processor;
pub mod page_timeout;
pub mod progress;
pub mod session;

// Re-exports for public API
pub use session::CrawlSession;

// Re-export orchestration and progress types for advanced usage
pub use frontier::Frontier;
pub use orchestrator::{CrawlScheduler, SchedulerOutput};
pub use progress::{CrawlPhase, NoOpProgress, ProgressReporter};

// Re-export crawl types
pub use cleanup::CleanupResult;
pub use crawl_types::{CrawlError, CrawlQueue, CrawlResult, CrawlStats, ErrorEntry, ErrorKind};
