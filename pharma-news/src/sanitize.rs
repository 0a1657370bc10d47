//! Plain-text extraction from feed markup and article pages.

use crate::types::{DashboardError, Result};
use scraper::{ElementRef, Html, Selector};

/// Elements whose content never counts as text.
const SKIPPED_ELEMENTS: [&str; 3] = ["img", "script", "style"];

/// Containers tried in order when looking for an article body.
const BODY_SELECTORS: [&str; 4] = ["article", "div.article-content", "div.content", "body"];

/// Strip markup from a feed-supplied fragment.
///
/// Images are removed along with their content, then the remaining text
/// nodes are concatenated in document order. Whitespace is kept as the
/// parser produced it. Never fails: markup without any text yields `""`.
pub fn sanitize(raw_html: &str) -> String {
    if raw_html.is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(raw_html);
    fragment
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
            })
        })
        .filter_map(|node| node.value().as_text().map(|text| &**text))
        .collect()
}

/// Extract the body text of a full article page.
///
/// The first matching container among `article`, `div.article-content`,
/// `div.content` and `body` is used. Every non-empty paragraph inside it
/// becomes one line.
pub fn extract_article_text(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let paragraph = selector("p")?;

    for css in BODY_SELECTORS {
        let container_selector = selector(css)?;
        if let Some(container) = document.select(&container_selector).next() {
            return Ok(paragraph_text(container, &paragraph));
        }
    }

    Ok(String::new())
}

fn paragraph_text(container: ElementRef<'_>, paragraph: &Selector) -> String {
    container
        .select(paragraph)
        .map(|p| p.text().map(str::trim).collect::<String>())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| DashboardError::Parse(format!("Invalid selector {}: {}", css, e)))
}
