//! Page rendering capability.
//!
//! The crawl engine only needs to open an isolated context, navigate it, run
//! DOM queries and evaluate scripts. These traits describe exactly that, and
//! two adapters implement them:
//!
//! - [`chromium::ChromiumRenderer`] drives a real browser over CDP.
//! - [`static_page::StaticRenderer`] fetches HTML over HTTP and queries it
//!   with `scraper`; it cannot evaluate scripts.
//!
//! Futures returned by these traits are not required to be `Send`: the
//! scheduler polls a batch in place instead of spawning tasks.

pub mod chromium;
pub mod static_page;

use std::time::Duration;

pub use chromium::{ChromiumElement, ChromiumPage, ChromiumRenderer};
pub use static_page::{DetachedPage, StaticElement, StaticPage, StaticRenderer};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    #[error("{0} is not supported by this renderer")]
    Unsupported(&'static str),

    #[error("browser context error: {0}")]
    Context(String),

    #[error("no document loaded")]
    NotLoaded,
}

/// Creates isolated page contexts.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    type Page: PageHandle;

    /// Open a fresh context whose cookies and storage are not shared with
    /// any other context, and return a page inside it.
    async fn new_isolated_context(&self, user_agent: &str) -> Result<Self::Page, RenderError>;
}

/// One page inside an isolated context.
#[allow(async_fn_in_trait)]
pub trait PageHandle {
    type Element: ElementHandle;

    async fn navigate(
        &self,
        url: &str,
        timeout: Duration,
        wait_until_idle: bool,
    ) -> Result<(), RenderError>;

    async fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>, RenderError>;

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Element>, RenderError>;

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, RenderError>;

    async fn title(&self) -> Result<String, RenderError>;

    /// URL of the loaded document after redirects.
    async fn current_url(&self) -> Result<String, RenderError>;

    /// Release the page and its context.
    async fn close(self) -> Result<(), RenderError>;
}

#[allow(async_fn_in_trait)]
pub trait ElementHandle {
    async fn attribute(&self, name: &str) -> Result<Option<String>, RenderError>;
}
