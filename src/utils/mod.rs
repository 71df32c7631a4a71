pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{normalize_url, origin_base, resolve_url, same_origin};
