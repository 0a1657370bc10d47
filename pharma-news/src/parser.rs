use crate::types::{DashboardError, ParsedEntry, ParsedFeed, Result};
use feed_rs::parser;
use tracing::{debug, info};

/// Turns RSS, Atom and JSON feed documents into [`ParsedEntry`] values.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &[u8]) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| DashboardError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let entries: Vec<ParsedEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();

        info!(
            "Parsed feed {} with {} entries",
            title.as_deref().unwrap_or("(untitled)"),
            entries.len()
        );

        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> ParsedEntry {
        let url = entry
            .links
            .first()
            .map(|link| link.href.clone())
            .unwrap_or_default();

        ParsedEntry {
            url,
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            summary: entry.summary.map(|s| s.content),
            content: entry.content.and_then(|c| c.body),
            published_at: entry.published,
            updated_at: entry.updated,
        }
    }
}
