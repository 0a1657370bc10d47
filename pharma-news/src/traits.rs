use crate::types::Result;
use async_trait::async_trait;

/// Network access used by the aggregator.
///
/// [`crate::Fetcher`] is the HTTP implementation; tests swap in sources
/// that serve documents from memory.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch a feed document and return its raw bytes. Decoding is left
    /// to the feed parser, which honours the XML encoding declaration.
    async fn fetch_feed(&self, url: &str) -> Result<Vec<u8>>;

    /// Fetch an article page and return its HTML.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}
