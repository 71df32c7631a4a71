//! Page metadata extraction through DOM queries.
//!
//! Each field is read on its own; a failed read is logged and leaves that
//! field at its default.

use log::debug;
use url::Url;

use super::schema::{ImageInfo, PageMetadata};
use crate::renderer::{ElementHandle, PageHandle, RenderError};

/// Attribute `attribute` of the first element matching `selector`.
async fn first_attribute<P: PageHandle>(
    page: &P,
    selector: &str,
    attribute: &str,
) -> Result<Option<String>, RenderError> {
    match page.query_selector(selector).await? {
        Some(element) => element.attribute(attribute).await,
        None => Ok(None),
    }
}

fn settle<T: Default>(url: &str, field: &str, read: Result<T, RenderError>) -> T {
    read.unwrap_or_else(|e| {
        debug!(target: "sitescout::metadata", "{url}: could not read {field}: {e}");
        T::default()
    })
}

/// Read the metadata record for a page loaded from `url`.
///
/// Image sources are resolved against `url`.
pub async fn extract_metadata<P: PageHandle>(page: &P, url: &str) -> PageMetadata {
    let mut metadata = PageMetadata::new(url);

    metadata.title = settle(url, "title", page.title().await);
    metadata.description = settle(
        url,
        "description",
        first_attribute(page, r#"meta[name="description"]"#, "content").await,
    )
    .unwrap_or_default();
    metadata.canonical_url = settle(
        url,
        "canonical",
        first_attribute(page, r#"link[rel="canonical"]"#, "href").await,
    );

    metadata.og_title = settle(
        url,
        "og:title",
        first_attribute(page, r#"meta[property="og:title"]"#, "content").await,
    );
    metadata.og_description = settle(
        url,
        "og:description",
        first_attribute(page, r#"meta[property="og:description"]"#, "content").await,
    );
    metadata.og_image = settle(
        url,
        "og:image",
        first_attribute(page, r#"meta[property="og:image"]"#, "content").await,
    );

    metadata.twitter_card = settle(
        url,
        "twitter:card",
        first_attribute(page, r#"meta[name="twitter:card"]"#, "content").await,
    );
    metadata.twitter_title = settle(
        url,
        "twitter:title",
        first_attribute(page, r#"meta[name="twitter:title"]"#, "content").await,
    );
    metadata.twitter_description = settle(
        url,
        "twitter:description",
        first_attribute(page, r#"meta[name="twitter:description"]"#, "content").await,
    );
    metadata.twitter_image = settle(
        url,
        "twitter:image",
        first_attribute(page, r#"meta[name="twitter:image"]"#, "content").await,
    );

    metadata.hreflang_tags = settle(url, "hreflang", hreflang_pairs(page).await)
        .into_iter()
        .collect();

    let robots = settle(
        url,
        "robots meta",
        first_attribute(page, r#"meta[name="robots"]"#, "content").await,
    )
    .unwrap_or_default()
    .to_lowercase();
    metadata.noindex = robots.contains("noindex");
    metadata.nofollow = robots.contains("nofollow");

    metadata.images = settle(url, "images", images(page, url).await);

    metadata
}

async fn hreflang_pairs<P: PageHandle>(page: &P) -> Result<Vec<(String, String)>, RenderError> {
    let mut pairs = Vec::new();
    for link in page
        .query_selector_all(r#"link[rel="alternate"][hreflang]"#)
        .await?
    {
        let language = link.attribute("hreflang").await?;
        let href = link.attribute("href").await?;
        if let (Some(language), Some(href)) = (language, href)
            && !language.is_empty()
            && !href.is_empty()
        {
            pairs.push((language, href));
        }
    }
    Ok(pairs)
}

async fn images<P: PageHandle>(page: &P, url: &str) -> Result<Vec<ImageInfo>, RenderError> {
    let base = Url::parse(url).ok();
    let mut images = Vec::new();

    for img in page.query_selector_all("img").await? {
        let Some(src) = img.attribute("src").await?.filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        let src = base
            .as_ref()
            .and_then(|base| base.join(src.trim()).ok())
            .map_or(src, String::from);
        images.push(ImageInfo {
            src,
            alt: img.attribute("alt").await?.unwrap_or_default(),
            srcset: img.attribute("srcset").await?.unwrap_or_default(),
        });
    }
    Ok(images)
}
