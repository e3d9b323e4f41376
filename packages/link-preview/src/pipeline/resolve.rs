//! Resolution of resource references against the page URL.

use url::Url;

/// Turn an image or icon reference into an absolute URL.
///
/// References that already start with `http://` or `https://` are returned
/// untouched. Anything else is resolved against `base`; if that fails the
/// original string is returned so one bad attribute never sinks a preview.
pub fn resolve_reference(reference: &str, base: &Url) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }

    match base.join(reference) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => reference.to_string(),
    }
}

/// Default favicon location for a page: `scheme://host[:port]/favicon.ico`.
pub fn default_favicon(base: &Url) -> String {
    format!(
        "{}://{}/favicon.ico",
        base.scheme(),
        crate::types::record::domain_of(base)
    )
}
