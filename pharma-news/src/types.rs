use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named RSS/Atom feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A named therapy area and the keywords that put an article into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TherapyArea {
    pub name: String,
    pub keywords: Vec<String>,
}

impl TherapyArea {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// A dated, sanitized feed entry ready for classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    /// Display form of `published_at`.
    pub published: String,
    pub published_at: DateTime<Utc>,
    pub summary: String,
    /// Body text of the linked page. `None` when enrichment is off,
    /// empty when the page could not be fetched.
    #[serde(skip_serializing)]
    pub full_text: Option<String>,
    pub source: String,
}

impl Article {
    /// Text the classifier matches keywords against.
    pub fn searchable_text(&self) -> String {
        match &self.full_text {
            Some(full_text) => format!("{} {} {}", self.title, self.summary, full_text),
            None => format!("{} {}", self.title, self.summary),
        }
    }
}

/// One feed entry as read from the feed document, before filtering.
#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub url: String,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ParsedEntry {
    /// Published date, falling back to the updated date.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.updated_at)
    }

    /// Raw summary markup, falling back to the content body.
    pub fn raw_summary(&self) -> &str {
        self.summary
            .as_deref()
            .filter(|summary| !summary.is_empty())
            .or(self.content.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

/// Articles of one therapy area, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaBucket {
    pub area: String,
    pub articles: Vec<Article>,
}

/// Output of the grouping stage: one bucket per configured area, in
/// configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedArticles {
    buckets: Vec<AreaBucket>,
}

impl GroupedArticles {
    pub fn with_areas<'a>(areas: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            buckets: areas
                .into_iter()
                .map(|area| AreaBucket {
                    area: area.to_string(),
                    articles: Vec::new(),
                })
                .collect(),
        }
    }

    pub(crate) fn bucket_mut(&mut self, index: usize) -> Option<&mut Vec<Article>> {
        self.buckets.get_mut(index).map(|bucket| &mut bucket.articles)
    }

    pub fn area_names(&self) -> Vec<&str> {
        self.buckets.iter().map(|bucket| bucket.area.as_str()).collect()
    }

    pub fn get(&self, area: &str) -> Option<&[Article]> {
        self.bucket(area).map(|bucket| bucket.articles.as_slice())
    }

    pub fn bucket(&self, area: &str) -> Option<&AreaBucket> {
        self.buckets.iter().find(|bucket| bucket.area == area)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AreaBucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub article_timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
    pub cache_ttl_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "pharma-news/0.1".to_string(),
            timeout_seconds: 30,
            article_timeout_seconds: 10,
            max_retries: 2,
            retry_delay_seconds: 1,
            max_feed_size_mb: 10,
            max_redirects: 5,
            cache_ttl_seconds: 3600,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Configuration error in {path}: {message}")]
    Config { path: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Unknown therapy area {name:?}, expected one of: {}", .available.join(", "))]
    UnknownArea { name: String, available: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
