//! Terminal rendering of grouped articles.

use crate::types::{AreaBucket, Result};

/// Markdown for one therapy area: a heading, then one block per article,
/// or a "no articles" line when the bucket is empty.
pub fn render_markdown(bucket: &AreaBucket, window_days: i64) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {}\n\n", bucket.area));

    if bucket.articles.is_empty() {
        out.push_str(&format!("_No articles found in the past {} days_\n", window_days));
        return out;
    }

    for article in &bucket.articles {
        out.push_str(&format!("### [{}]({})\n\n", article.title.trim(), article.link));
        out.push_str(&format!("**Published:** {}\n\n", article.published));
        let summary = article.summary.trim();
        if !summary.is_empty() {
            out.push_str(&format!("{}\n\n", summary));
        }
        out.push_str("---\n\n");
    }

    out
}

pub fn render_json(buckets: &[&AreaBucket]) -> Result<String> {
    Ok(serde_json::to_string_pretty(buckets)?)
}
