use crate::traits::PageSource;
use crate::types::{DashboardError, FetchConfig, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// HTTP client for feed documents and article pages.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch a feed document, retrying transient failures with
    /// exponential backoff.
    pub async fn fetch_feed(&self, url: &str) -> Result<Vec<u8>> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let retry_delay = Duration::from_secs(self.config.retry_delay_seconds);
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: retry_delay,
            initial_interval: retry_delay,
            max_interval: retry_delay * 32,
            multiplier: 2.0,
            max_elapsed_time: Some(retry_delay * 60),
            ..Default::default()
        };

        let mut attempt = 0;
        loop {
            match self.try_fetch_feed(url).await {
                Ok(content) => {
                    info!(
                        "Fetched feed: {} ({} bytes in {}ms)",
                        url,
                        content.len(),
                        start_time.elapsed().as_millis()
                    );
                    return Ok(content);
                }
                Err(e) if attempt < self.config.max_retries && is_retryable(&e) => {
                    let Some(delay) = backoff.next_backoff() else {
                        return Err(e);
                    };
                    attempt += 1;
                    warn!("Attempt {} failed for {}: {}, retrying in {:?}", attempt, url, e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!("Failed to fetch feed after {} attempts: {}", attempt + 1, url);
                    return Err(e);
                }
            }
        }
    }

    /// One attempt at `url`. The body is read chunk by chunk so the size
    /// limit also holds when the server sends no Content-Length.
    async fn try_fetch_feed(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let mut response = check_status(response)?;
        let limit = self.config.max_feed_size_mb * 1024 * 1024;

        if let Some(content_length) = response.content_length() {
            if content_length as usize > limit {
                return Err(too_large(content_length as usize));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(too_large(body.len() + chunk.len()));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    /// Fetch an article page with the shorter article timeout. No retries:
    /// full text is an optional extra.
    pub async fn fetch_full_content(&self, url: &str) -> Result<String> {
        debug!("Fetching full content from: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.article_timeout_seconds))
            .send()
            .await?;

        Ok(check_status(response)?.text().await?)
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_feed(&self, url: &str) -> Result<Vec<u8>> {
        Fetcher::fetch_feed(self, url).await
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.fetch_full_content(url).await
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DashboardError::General(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown")
        )))
    }
}

fn too_large(bytes: usize) -> DashboardError {
    DashboardError::FeedTooLarge {
        size_mb: bytes / (1024 * 1024),
    }
}

fn is_retryable(error: &DashboardError) -> bool {
    !matches!(error, DashboardError::FeedTooLarge { .. })
}
