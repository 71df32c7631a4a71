use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `<img>` found on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Absolute URL of the `src` attribute.
    pub src: String,
    pub alt: String,
    pub srcset: String,
}

/// Metadata extracted from one rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub url: String,
    pub title: String,
    pub description: String,
    pub canonical_url: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_card: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    /// Language tag to alternate URL.
    pub hreflang_tags: BTreeMap<String, String>,
    pub noindex: bool,
    pub nofollow: bool,
    pub images: Vec<ImageInfo>,
    /// Same-origin links found on the page, in discovery order.
    pub links: Vec<String>,
}

impl PageMetadata {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Typed result of the router-state script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterProbe {
    /// Paths declared by client-side router globals.
    #[serde(default)]
    pub routes: Vec<String>,
    /// Text of inline `<script>` tags, already capped in count and length.
    #[serde(default)]
    pub inline_scripts: Vec<String>,
}
