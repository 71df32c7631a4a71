//! HTTP-only renderer backed by `scraper`.
//!
//! Fetches the raw HTML of a page and answers DOM queries against the parsed
//! document. Scripts never run, so [`PageHandle::evaluate`] reports
//! [`RenderError::Unsupported`] and script-driven link strategies soft-fail.

use scraper::{Html, Selector};
use std::cell::RefCell;
use std::time::Duration;

use super::{ElementHandle, PageHandle, PageRenderer, RenderError};
use crate::fetcher::{FetchError, HttpFetcher, ReqwestFetcher};

/// Renderer that hands out one fresh document per context.
#[derive(Debug, Clone)]
pub struct StaticRenderer<F> {
    fetcher: F,
}

impl<F: HttpFetcher + Clone> StaticRenderer<F> {
    /// The fetcher's own user agent is used for every page.
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

impl<F: HttpFetcher + Clone> PageRenderer for StaticRenderer<F> {
    type Page = StaticPage<F>;

    async fn new_isolated_context(&self, _user_agent: &str) -> Result<Self::Page, RenderError> {
        Ok(StaticPage {
            fetcher: Some(self.fetcher.clone()),
            document: RefCell::new(None),
        })
    }
}

struct LoadedDocument {
    html: Html,
    url: String,
}

/// A single parsed HTML document.
pub struct StaticPage<F = ReqwestFetcher> {
    fetcher: Option<F>,
    document: RefCell<Option<LoadedDocument>>,
}

/// A page built from an HTML string with no way to navigate elsewhere.
pub type DetachedPage = StaticPage<ReqwestFetcher>;

impl StaticPage<ReqwestFetcher> {
    /// Build a page from markup already in memory, as if loaded from `url`.
    #[must_use]
    pub fn from_html(html: &str, url: &str) -> Self {
        Self {
            fetcher: None,
            document: RefCell::new(Some(LoadedDocument {
                html: Html::parse_document(html),
                url: url.to_string(),
            })),
        }
    }
}

impl<F> StaticPage<F> {
    fn with_document<T>(&self, f: impl FnOnce(&LoadedDocument) -> T) -> Result<T, RenderError> {
        let document = self.document.borrow();
        document.as_ref().map(f).ok_or(RenderError::NotLoaded)
    }

    fn select(&self, selector: &str) -> Result<Vec<StaticElement>, RenderError> {
        let parsed = Selector::parse(selector).map_err(|e| RenderError::InvalidSelector {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;
        self.with_document(|doc| {
            doc.html
                .select(&parsed)
                .map(|element| StaticElement {
                    attributes: element
                        .value()
                        .attrs()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect(),
                })
                .collect()
        })
    }
}

impl<F: HttpFetcher> PageHandle for StaticPage<F> {
    type Element = StaticElement;

    async fn navigate(
        &self,
        url: &str,
        timeout: Duration,
        _wait_until_idle: bool,
    ) -> Result<(), RenderError> {
        let Some(fetcher) = self.fetcher.as_ref() else {
            return Err(RenderError::Unsupported("navigation of a detached page"));
        };

        let response = fetcher.get(url, timeout).await.map_err(|e| match e {
            FetchError::Timeout { url, timeout } => RenderError::Timeout { url, timeout },
            other => RenderError::Navigation {
                url: url.to_string(),
                message: other.to_string(),
            },
        })?;

        // There is no rendered error page worth cataloging without a browser.
        if response.status >= 400 {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: format!("HTTP {}", response.status),
            });
        }

        let html = Html::parse_document(&String::from_utf8_lossy(&response.body));
        *self.document.borrow_mut() = Some(LoadedDocument {
            html,
            url: response.final_url,
        });
        Ok(())
    }

    async fn query_selector(&self, selector: &str) -> Result<Option<StaticElement>, RenderError> {
        Ok(self.select(selector)?.into_iter().next())
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<StaticElement>, RenderError> {
        self.select(selector)
    }

    async fn evaluate(&self, _script: &str) -> Result<serde_json::Value, RenderError> {
        Err(RenderError::Unsupported("script evaluation"))
    }

    async fn title(&self) -> Result<String, RenderError> {
        let selector = Selector::parse("title").map_err(|e| RenderError::InvalidSelector {
            selector: "title".to_string(),
            message: e.to_string(),
        })?;
        self.with_document(|doc| {
            doc.html
                .select(&selector)
                .next()
                .map(|title| title.text().collect::<String>().trim().to_string())
                .unwrap_or_default()
        })
    }

    async fn current_url(&self) -> Result<String, RenderError> {
        self.with_document(|doc| doc.url.clone())
    }

    async fn close(self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Attributes captured from a matched element.
#[derive(Debug, Clone, Default)]
pub struct StaticElement {
    attributes: Vec<(String, String)>,
}

impl ElementHandle for StaticElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>, RenderError> {
        Ok(self
            .attributes
            .iter()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn detached_page_answers_queries() {
        let page = DetachedPage::from_html(
            r#"<html><head><title> Hello </title></head>
            <body><a href="/one" class="x">1</a><a href="/two">2</a></body></html>"#,
            "https://example.com/",
        );

        assert_eq!(page.title().await.unwrap(), "Hello");
        assert_eq!(page.current_url().await.unwrap(), "https://example.com/");

        let anchors = page.query_selector_all("a[href]").await.unwrap();
        assert_eq!(anchors.len(), 2);
        assert_eq!(
            anchors[1].attribute("href").await.unwrap().as_deref(),
            Some("/two")
        );

        let missing = page.query_selector("img").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn invalid_selector_is_reported() {
        let page = DetachedPage::from_html("<p></p>", "https://example.com/");
        let err = page.query_selector_all("a[").await.unwrap_err();
        assert!(matches!(err, RenderError::InvalidSelector { .. }));
    }

    #[tokio::test]
    async fn evaluate_is_unsupported() {
        let page = DetachedPage::from_html("<p></p>", "https://example.com/");
        assert!(matches!(
            page.evaluate("1 + 1").await,
            Err(RenderError::Unsupported(_))
        ));
    }
}
