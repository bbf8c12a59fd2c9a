//! Reducing configured store URLs to the parts requests and errors need.

use reqwest::Url;

/// The `scheme://host[:port]` a store's catalog and cart live under.
///
/// Shops are often configured with a landing page such as
/// `https://shop.example.com/collections/all`; the path is discarded.
/// Input that does not parse is cut at the first `/` after the scheme.
#[must_use]
pub fn extract_store_origin(store_url: &str) -> String {
    match Url::parse(store_url) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(err) => {
            tracing::warn!(store_url, error = %err, "unparseable store URL; trimming path by hand");
            let (scheme, rest) = store_url.split_once("://").unwrap_or(("", store_url));
            let host = rest.split('/').next().unwrap_or_default();
            if scheme.is_empty() {
                host.to_owned()
            } else {
                format!("{scheme}://{host}")
            }
        }
    }
}

/// Host shown in rate-limit errors; the raw input when there is none.
pub(super) fn extract_domain(url: &str) -> String {
    let parsed = Url::parse(url).ok();
    match parsed.as_ref().and_then(Url::host_str) {
        Some(host) => host.to_owned(),
        None => url.to_owned(),
    }
}
