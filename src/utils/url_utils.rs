//! URL resolution and origin helpers shared by discovery and extraction.

use url::{Origin, Url};

/// Normalize a URL by stripping its fragment.
///
/// `#section` markers address the same HTTP resource, so they are dropped
/// before any dedup or frontier bookkeeping.
#[must_use]
pub fn normalize_url(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Resolve a raw reference found in a page against that page's URL.
///
/// Returns `None` for references that fail to join or that resolve to a
/// non-http(s) scheme. The result carries no fragment.
#[must_use]
pub fn resolve_url(base: &Url, raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let joined = base.join(raw).ok()?;
    match joined.scheme() {
        "http" | "https" => Some(normalize_url(joined)),
        _ => None,
    }
}

/// True when `url` shares scheme, host and port with `origin`.
#[must_use]
pub fn same_origin(url: &Url, origin: &Origin) -> bool {
    &url.origin() == origin
}

/// Serialize an origin back into `scheme://host[:port]` form without a trailing slash.
#[must_use]
pub fn origin_base(origin: &Origin) -> String {
    origin.ascii_serialization()
}
