//! Chromium renderer over the DevTools protocol.
//!
//! Each context is a separate CDP browser context, so cookies and storage
//! set by one page are invisible to concurrently rendered pages.

use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::{Browser, Element, Page};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{ElementHandle, PageHandle, PageRenderer, RenderError};
use crate::browser_setup::launch_browser;
use crate::config::CrawlConfig;
use crate::crawl_engine::cleanup::{CleanupResult, cleanup_browser_and_data};

pub struct ChromiumRenderer {
    browser: Arc<Browser>,
    handler_task: JoinHandle<()>,
    user_data_dir: PathBuf,
}

impl ChromiumRenderer {
    /// Find or download a browser and launch it with the config's headless setting.
    pub async fn launch(config: &CrawlConfig) -> Result<Self> {
        let (browser, handler_task, user_data_dir) =
            launch_browser(config.headless(), config.navigation_timeout()).await?;
        Ok(Self {
            browser: Arc::new(browser),
            handler_task,
            user_data_dir,
        })
    }

    /// Close the browser and remove its profile directory.
    ///
    /// Pages still holding the browser keep it alive; in that case cleanup
    /// is left to drop.
    pub async fn shutdown(self) -> CleanupResult {
        let result = match Arc::try_unwrap(self.browser) {
            Ok(browser) => cleanup_browser_and_data(browser, &self.user_data_dir).await,
            Err(shared) => {
                let refs = Arc::strong_count(&shared);
                warn!(
                    target: "sitescout::cleanup",
                    "Browser still has {refs} strong references, cleanup will happen on drop"
                );
                CleanupResult::PartialFailure(vec![format!("browser still shared by {refs} owners")])
            }
        };

        // Abort the handler only after the browser is closed.
        self.handler_task.abort();
        if let Err(e) = self.handler_task.await
            && !e.is_cancelled()
        {
            warn!(target: "sitescout::cleanup", "Handler task failed during abort: {e}");
        }
        result
    }
}

fn context_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Context(e.to_string())
}

impl PageRenderer for ChromiumRenderer {
    type Page = ChromiumPage;

    async fn new_isolated_context(&self, user_agent: &str) -> Result<ChromiumPage, RenderError> {
        let context_id = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(context_error)?
            .result
            .browser_context_id;

        let target = blank_target(&context_id)?;

        let page = match self.browser.new_page(target).await {
            Ok(page) => page,
            Err(e) => {
                dispose_context(&self.browser, context_id).await;
                return Err(context_error(e));
            }
        };

        if let Err(e) = page.set_user_agent(user_agent.to_string()).await {
            debug!(target: "sitescout::crawl", "Failed to set user agent: {e}");
        }

        Ok(ChromiumPage {
            page,
            browser: Arc::clone(&self.browser),
            context_id,
        })
    }
}

/// An `about:blank` target opened inside `context_id`.
fn blank_target(context_id: &BrowserContextId) -> Result<CreateTargetParams, RenderError> {
    CreateTargetParams::builder()
        .url("about:blank")
        .browser_context_id(context_id.clone())
        .build()
        .map_err(context_error)
}

async fn dispose_context(browser: &Browser, context_id: BrowserContextId) {
    if let Err(e) = browser
        .execute(DisposeBrowserContextParams::new(context_id))
        .await
    {
        debug!(target: "sitescout::crawl", "Failed to dispose browser context: {e}");
    }
}

/// A page living in its own browser context.
pub struct ChromiumPage {
    page: Page,
    browser: Arc<Browser>,
    context_id: BrowserContextId,
}

impl PageHandle for ChromiumPage {
    type Element = ChromiumElement;

    async fn navigate(
        &self,
        url: &str,
        timeout: Duration,
        wait_until_idle: bool,
    ) -> Result<(), RenderError> {
        let navigation = async {
            self.page.goto(url).await?;
            if wait_until_idle {
                self.page.wait_for_navigation().await?;
            }
            Ok::<_, chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(RenderError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
                timeout,
            }),
        }
    }

    async fn query_selector(&self, selector: &str) -> Result<Option<ChromiumElement>, RenderError> {
        Ok(self.query_selector_all(selector).await?.into_iter().next())
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<ChromiumElement>, RenderError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| RenderError::InvalidSelector {
                selector: selector.to_string(),
                message: e.to_string(),
            })?;
        Ok(elements.into_iter().map(ChromiumElement).collect())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, RenderError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| RenderError::Evaluation(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn title(&self) -> Result<String, RenderError> {
        let title = self.page.get_title().await.map_err(context_error)?;
        Ok(title.unwrap_or_default())
    }

    async fn current_url(&self) -> Result<String, RenderError> {
        let url = self.page.url().await.map_err(context_error)?;
        url.ok_or(RenderError::NotLoaded)
    }

    async fn close(self) -> Result<(), RenderError> {
        let closed = self.page.close().await.map_err(context_error);
        dispose_context(&self.browser, self.context_id).await;
        closed
    }
}

pub struct ChromiumElement(Element);

impl ElementHandle for ChromiumElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>, RenderError> {
        self.0
            .attribute(name)
            .await
            .map_err(|e| RenderError::Evaluation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_target_is_bound_to_its_context() {
        let context_id = BrowserContextId::new("ctx-1");
        let target = blank_target(&context_id).unwrap();

        assert_eq!(target.url, "about:blank");
        assert_eq!(target.browser_context_id, Some(context_id));
    }
}
