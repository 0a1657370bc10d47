use crate::aggregators::group;
use crate::cache::TtlCache;
use crate::config::DashboardConfig;
use crate::parser::FeedParser;
use crate::recency::{cutoff, is_within_window, window};
use crate::sanitize::{extract_article_text, sanitize};
use crate::traits::PageSource;
use crate::types::{Article, FeedSource, GroupedArticles, ParsedFeed, Result};
use crate::utils::url::is_http_url;
use crate::Fetcher;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Runs fetch cycles: fetch every source, keep recent entries, optionally
/// enrich them with full article text, and group them by therapy area.
pub struct NewsAggregator<S = Fetcher> {
    config: DashboardConfig,
    source: S,
    parser: FeedParser,
    feed_cache: RwLock<TtlCache<ParsedFeed>>,
    page_cache: RwLock<TtlCache<String>>,
}

impl NewsAggregator<Fetcher> {
    /// Aggregator backed by the HTTP [`Fetcher`].
    pub fn from_config(config: DashboardConfig) -> Result<Self> {
        let fetcher = Fetcher::new(config.fetch.clone())?;
        Ok(Self::new(config, fetcher))
    }
}

impl<S: PageSource> NewsAggregator<S> {
    pub fn new(config: DashboardConfig, source: S) -> Self {
        let ttl = std::time::Duration::from_secs(config.fetch.cache_ttl_seconds);
        Self {
            config,
            source,
            parser: FeedParser::new(),
            feed_cache: RwLock::new(TtlCache::new(ttl)),
            page_cache: RwLock::new(TtlCache::new(ttl)),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn run_cycle(&self) -> GroupedArticles {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one full cycle with `now` as the reference time for the
    /// recency window.
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> GroupedArticles {
        let expired_feeds = self.feed_cache.write().await.purge_expired();
        let expired_pages = self.page_cache.write().await.purge_expired();
        let expired = expired_feeds + expired_pages;
        if expired > 0 {
            debug!("Dropped {} expired cache entries", expired);
        }

        info!(
            "Starting fetch cycle: {} sources, window {} days (since {})",
            self.config.sources.len(),
            self.config.window_days,
            cutoff(now, self.config.window_days).to_rfc3339()
        );

        let articles = self.fetch_all(&self.config.sources, now).await;
        group(&articles, &self.config.therapy_areas)
    }

    /// Fetch every source in order. A failing source contributes no
    /// articles and never stops the others.
    pub async fn fetch_all(&self, sources: &[FeedSource], now: DateTime<Utc>) -> Vec<Article> {
        let mut articles = Vec::new();
        let mut pages = HashMap::new();
        let mut successful_fetches = 0;

        for source in sources {
            match self.fetch_source(source, now, &mut pages).await {
                Ok(found) => {
                    info!("Source {}: {} recent articles", source.name, found.len());
                    articles.extend(found);
                    successful_fetches += 1;
                }
                Err(e) => {
                    error!("Failed to fetch source {} ({}): {}", source.name, source.url, e);
                }
            }
        }

        info!(
            "Fetched {}/{} sources, {} articles",
            successful_fetches,
            sources.len(),
            articles.len()
        );
        articles
    }

    async fn fetch_source(
        &self,
        source: &FeedSource,
        now: DateTime<Utc>,
        pages: &mut HashMap<String, String>,
    ) -> Result<Vec<Article>> {
        let parsed_feed = self.feed(&source.url).await?;
        let max_age = window(self.config.window_days);
        let mut articles = Vec::new();

        for entry in parsed_feed.entries {
            let Some(published_at) = entry.timestamp() else {
                debug!("Skipping undated entry {:?} from {}", entry.title, source.name);
                continue;
            };
            if !is_within_window(published_at, now, max_age) {
                debug!("Skipping stale entry {:?} from {}", entry.title, source.name);
                continue;
            }

            let full_text = if self.config.fetch_full_text {
                Some(self.full_text(&entry.url, pages).await)
            } else {
                None
            };

            articles.push(Article {
                title: sanitize(&entry.title),
                summary: sanitize(entry.raw_summary()),
                link: entry.url,
                published: published_at.to_rfc2822(),
                published_at,
                full_text,
                source: source.name.clone(),
            });
        }

        Ok(articles)
    }

    /// Parsed feed at `url`. Only documents that parse are cached, so a
    /// broken response is fetched again on the next cycle.
    async fn feed(&self, url: &str) -> Result<ParsedFeed> {
        if let Some(parsed_feed) = self.feed_cache.read().await.get(url) {
            debug!("Using cached feed for {}", url);
            return Ok(parsed_feed);
        }

        let content = self.source.fetch_feed(url).await?;
        let parsed_feed = self.parser.parse_feed(&content)?;
        self.feed_cache.write().await.insert(url, parsed_feed.clone());
        Ok(parsed_feed)
    }

    /// Body text of the page behind `link`, fetched at most once per cycle.
    /// Failures are logged and yield an empty string.
    async fn full_text(&self, link: &str, pages: &mut HashMap<String, String>) -> String {
        if !is_http_url(link) {
            debug!("No fetchable link for full text: {:?}", link);
            return String::new();
        }
        if let Some(text) = pages.get(link) {
            return text.clone();
        }
        if let Some(text) = self.page_cache.read().await.get(link) {
            pages.insert(link.to_string(), text.clone());
            return text;
        }

        let text = match self.source.fetch_page(link).await {
            Ok(html) => extract_article_text(&html).unwrap_or_else(|e| {
                warn!("Error extracting article text at {}: {}", link, e);
                String::new()
            }),
            Err(e) => {
                warn!("Error fetching article at {}: {}", link, e);
                String::new()
            }
        };

        pages.insert(link.to_string(), text.clone());
        self.page_cache.write().await.insert(link, text.clone());
        text
    }
}
