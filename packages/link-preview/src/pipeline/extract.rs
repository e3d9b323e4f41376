//! Metadata extraction from a parsed HTML document.
//!
//! The document is walked depth-first in document order and every element
//! is visited once. Single-valued fields (title, description, favicon) keep
//! the first eligible value; `images` and `site_names` accumulate.

use scraper::{ElementRef, Html};
use url::Url;

use crate::pipeline::resolve::{default_favicon, resolve_reference};

/// Fields derived from a document, before they are stamped into a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub site_names: Vec<String>,
    pub favicon: Option<String>,
}

impl ExtractedMetadata {
    fn title_unset(&self) -> bool {
        self.title.as_deref().map_or(true, str::is_empty)
    }

    fn description_unset(&self) -> bool {
        self.description.is_none()
    }
}

/// Extract preview metadata from `document`, resolving references against `base`.
///
/// When the document names no icon, the favicon falls back to
/// `/favicon.ico` on the base URL's host.
pub fn extract_metadata(document: &Html, base: &Url) -> ExtractedMetadata {
    let mut metadata = ExtractedMetadata::default();

    for node in document.tree.root().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        match element.value().name() {
            "title" => visit_title(element, &mut metadata),
            "meta" => visit_meta(element, &mut metadata, base),
            "link" => visit_link(element, &mut metadata, base),
            _ => {}
        }
    }

    if metadata.favicon.is_none() {
        metadata.favicon = Some(default_favicon(base));
    }

    metadata
}

fn visit_title(element: ElementRef<'_>, metadata: &mut ExtractedMetadata) {
    if !metadata.title_unset() {
        return;
    }

    let text = element
        .first_child()
        .and_then(|child| child.value().as_text().map(|t| t.trim().to_string()));

    if let Some(text) = text {
        metadata.title = Some(text);
    }
}

fn visit_meta(element: ElementRef<'_>, metadata: &mut ExtractedMetadata, base: &Url) {
    let attrs = element.value();
    let name = attrs.attr("name").unwrap_or_default().to_lowercase();
    let property = attrs.attr("property").unwrap_or_default().to_lowercase();
    let content = attrs.attr("content").unwrap_or_default();

    if content.is_empty() {
        return;
    }

    // First matching rule wins; a guard that fails falls through to the next.
    if name == "description" && metadata.description_unset() {
        metadata.description = Some(content.to_string());
    } else if property == "og:description" && metadata.description_unset() {
        metadata.description = Some(content.to_string());
    } else if property == "og:title" && metadata.title_unset() {
        metadata.title = Some(content.to_string());
    } else if property == "og:image" {
        metadata.images.push(resolve_reference(content, base));
    } else if property == "og:site_name" {
        metadata.site_names.push(content.to_string());
    } else if name == "twitter:image" {
        let image = resolve_reference(content, base);
        if !metadata.images.contains(&image) {
            metadata.images.push(image);
        }
    } else if name == "twitter:title" && metadata.title_unset() {
        metadata.title = Some(content.to_string());
    } else if name == "twitter:description" && metadata.description_unset() {
        metadata.description = Some(content.to_string());
    }
}

fn visit_link(element: ElementRef<'_>, metadata: &mut ExtractedMetadata, base: &Url) {
    let attrs = element.value();
    let href = attrs.attr("href").unwrap_or_default();
    if href.is_empty() {
        return;
    }

    let rel = attrs.attr("rel").unwrap_or_default().to_lowercase();
    if rel.contains("icon") && metadata.favicon.is_none() {
        metadata.favicon = Some(resolve_reference(href, base));
    }
}
