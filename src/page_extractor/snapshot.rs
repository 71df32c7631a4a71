//! Raw DOM inputs for link extraction.
//!
//! Everything the link strategies need is read from the page up front. Each
//! input is captured independently as a `Result`, so a failed DOM query or
//! script evaluation only disables the strategy that depends on it.

use serde::de::DeserializeOwned;
use url::Url;

use super::js_scripts::{CSS_BACKGROUND_SCRIPT, ROUTER_STATE_SCRIPT};
use super::links::{DATA_URL_ATTRIBUTES, PAGINATION_SELECTORS};
use super::schema::RouterProbe;
use crate::renderer::{ElementHandle, PageHandle};

/// A captured input, or the reason it could not be read.
pub type Capture<T> = Result<T, String>;

/// Everything the seven link strategies read from a page.
#[derive(Debug, Clone)]
pub struct DomSnapshot {
    /// Base for resolving relative references.
    pub page_url: Url,
    /// `href` of every `a[href]`.
    pub anchors: Capture<Vec<String>>,
    /// Text of every `onclick` attribute.
    pub onclick_handlers: Capture<Vec<String>>,
    /// `(attribute, value)` pairs for the data attribute catalog.
    pub data_attributes: Capture<Vec<(String, String)>>,
    /// Every `srcset` attribute value.
    pub srcsets: Capture<Vec<String>>,
    /// Raw `background-image` values from stylesheet rules.
    pub css_backgrounds: Capture<Vec<String>>,
    /// `href` values per pagination selector.
    pub pagination: Vec<(String, Capture<Vec<String>>)>,
    pub router: Capture<RouterProbe>,
}

impl DomSnapshot {
    /// A snapshot with every input present and empty.
    #[must_use]
    pub fn empty(page_url: Url) -> Self {
        Self {
            page_url,
            anchors: Ok(Vec::new()),
            onclick_handlers: Ok(Vec::new()),
            data_attributes: Ok(Vec::new()),
            srcsets: Ok(Vec::new()),
            css_backgrounds: Ok(Vec::new()),
            pagination: Vec::new(),
            router: Ok(RouterProbe::default()),
        }
    }

    /// Read every strategy input from a loaded page.
    pub async fn capture<P: PageHandle>(page: &P, page_url: Url) -> Self {
        let anchors = attribute_values(page, "a[href]", "href").await;
        let onclick_handlers = attribute_values(page, "[onclick]", "onclick").await;
        let data_attributes = data_attribute_values(page).await;
        let srcsets = attribute_values(page, "[srcset]", "srcset").await;
        let css_backgrounds = evaluate_as::<Vec<String>, _>(page, CSS_BACKGROUND_SCRIPT).await;

        let mut pagination = Vec::with_capacity(PAGINATION_SELECTORS.len());
        for selector in PAGINATION_SELECTORS {
            let hrefs = attribute_values(page, selector, "href").await;
            pagination.push(((*selector).to_string(), hrefs));
        }

        let router = evaluate_as::<RouterProbe, _>(page, ROUTER_STATE_SCRIPT).await;

        Self {
            page_url,
            anchors,
            onclick_handlers,
            data_attributes,
            srcsets,
            css_backgrounds,
            pagination,
            router,
        }
    }
}

/// Non-empty values of `attribute` on every element matching `selector`.
async fn attribute_values<P: PageHandle>(
    page: &P,
    selector: &str,
    attribute: &str,
) -> Capture<Vec<String>> {
    let elements = page
        .query_selector_all(selector)
        .await
        .map_err(|e| e.to_string())?;

    let mut values = Vec::with_capacity(elements.len());
    for element in &elements {
        if let Some(value) = element.attribute(attribute).await.map_err(|e| e.to_string())?
            && !value.is_empty()
        {
            values.push(value);
        }
    }
    Ok(values)
}

async fn data_attribute_values<P: PageHandle>(page: &P) -> Capture<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for attribute in DATA_URL_ATTRIBUTES {
        let values = attribute_values(page, &format!("[{attribute}]"), attribute).await?;
        pairs.extend(values.into_iter().map(|v| ((*attribute).to_string(), v)));
    }
    Ok(pairs)
}

async fn evaluate_as<T: DeserializeOwned, P: PageHandle>(page: &P, script: &str) -> Capture<T> {
    let value = page.evaluate(script).await.map_err(|e| e.to_string())?;
    serde_json::from_value(value).map_err(|e| format!("unexpected script result: {e}"))
}
