//! The metadata record produced for one successfully fetched page.

use serde::{Deserialize, Serialize, Serializer};
use url::Url;

/// Link preview metadata for a single page.
///
/// Serialized with the wire keys consumers expect: `title, description,
/// images, sitename, favicon, duration, domain, url`. An unset title or
/// description is written as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Page title (`<title>`, `og:title` or `twitter:title`)
    #[serde(serialize_with = "empty_if_none", default, deserialize_with = "none_if_empty")]
    pub title: Option<String>,

    /// Page description (`description`, `og:description` or `twitter:description`)
    #[serde(serialize_with = "empty_if_none", default, deserialize_with = "none_if_empty")]
    pub description: Option<String>,

    /// Preview images in document order
    #[serde(default)]
    pub images: Vec<String>,

    /// `og:site_name` values in document order
    #[serde(rename = "sitename", default)]
    pub site_names: Vec<String>,

    /// Favicon URL, falling back to `/favicon.ico` on the page's host
    pub favicon: String,

    /// Milliseconds from pipeline start until the document was parsed
    #[serde(rename = "duration")]
    pub duration_ms: u64,

    /// Host (and non-default port) of the requested URL
    pub domain: String,

    /// The URL exactly as requested
    pub url: String,
}

impl MetadataRecord {
    /// Start an empty record for a requested URL.
    pub fn new(url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            title: None,
            description: None,
            images: Vec::new(),
            site_names: Vec::new(),
            favicon: String::new(),
            duration_ms: 0,
            domain: domain.into(),
            url: url.into(),
        }
    }
}

/// Host of a URL as shown in records, including an explicit non-default port.
pub fn domain_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn empty_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

fn none_if_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_wire_keys() {
        let mut record = MetadataRecord::new("https://example.com/page", "example.com");
        record.title = Some("Example".to_string());
        record.images.push("https://example.com/a.png".to_string());
        record.site_names.push("Example Site".to_string());
        record.favicon = "https://example.com/favicon.ico".to_string();
        record.duration_ms = 42;

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["title"], "Example");
        assert_eq!(json["description"], "");
        assert_eq!(json["images"][0], "https://example.com/a.png");
        assert_eq!(json["sitename"][0], "Example Site");
        assert_eq!(json["favicon"], "https://example.com/favicon.ico");
        assert_eq!(json["duration"], 42);
        assert_eq!(json["domain"], "example.com");
        assert_eq!(json["url"], "https://example.com/page");
        assert_eq!(json.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_empty_collections_are_arrays() {
        let record = MetadataRecord::new("https://example.com", "example.com");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["images"].as_array().unwrap().is_empty());
        assert!(json["sitename"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_domain_keeps_explicit_port() {
        let url = Url::parse("http://example.com:8080/x").unwrap();
        assert_eq!(domain_of(&url), "example.com:8080");

        let url = Url::parse("https://example.com:443/x").unwrap();
        assert_eq!(domain_of(&url), "example.com");
    }
}
