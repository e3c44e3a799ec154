//! Image URL qualification.
//!
//! The products API may return `imageUrl` relative to its own root. Every
//! record leaving [`crate::CatalogClient`] passes through
//! [`qualify_image_url`] so display code only ever sees absolute URLs.

use std::sync::LazyLock;

use catalog_core::Product;
use regex::Regex;
use serde_json::Value;

static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid absolute url regex")
});

/// Returns `url` unchanged when it already carries a scheme, otherwise joins
/// it onto `api_base` with exactly one slash between the two.
///
/// Idempotent whenever `api_base` is itself absolute.
#[must_use]
pub fn qualify_url(url: &str, api_base: &str) -> String {
    if ABSOLUTE_URL.is_match(url) {
        return url.to_owned();
    }
    let base = api_base.trim_end_matches('/');
    let path = url.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Qualifies the product's `image_url` against `api_base`.
///
/// Absent or empty image URLs are left untouched.
#[must_use]
pub fn qualify_image_url(mut product: Product, api_base: &str) -> Product {
    if let Some(url) = product.image_url.as_deref().filter(|u| !u.is_empty()) {
        product.image_url = Some(qualify_url(url, api_base));
    }
    product
}

/// Qualifies a top-level `imageUrl` string in a raw response body, such as
/// the upload endpoint's reply. Other shapes pass through unchanged.
pub(crate) fn qualify_body_image_url(mut body: Value, api_base: &str) -> Value {
    if let Some(Value::String(url)) = body.get_mut("imageUrl") {
        if !url.is_empty() {
            *url = qualify_url(url, api_base);
        }
    }
    body
}
