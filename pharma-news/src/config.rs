//! Dashboard configuration: feed sources, therapy areas and fetch settings.
//!
//! Both input files are JSON objects read once at startup. Key order is
//! kept, so sources are fetched and areas listed in file order.

use crate::types::{DashboardError, FeedSource, FetchConfig, Result, TherapyArea};
use crate::utils::url::is_http_url;
use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Immutable settings for one dashboard process.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub sources: Vec<FeedSource>,
    pub therapy_areas: Vec<TherapyArea>,
    pub window_days: i64,
    pub fetch_full_text: bool,
    pub fetch: FetchConfig,
}

impl DashboardConfig {
    pub fn new(sources: Vec<FeedSource>, therapy_areas: Vec<TherapyArea>) -> Self {
        Self {
            sources,
            therapy_areas,
            window_days: DEFAULT_WINDOW_DAYS,
            fetch_full_text: false,
            fetch: FetchConfig::default(),
        }
    }

    /// Load sources and therapy areas from their JSON files.
    pub fn from_files(sources_path: impl AsRef<Path>, areas_path: impl AsRef<Path>) -> Result<Self> {
        let sources_path = sources_path.as_ref();
        let areas_path = areas_path.as_ref();

        let sources = parse_sources(&read_config(sources_path)?, &sources_path.display().to_string())?;
        let therapy_areas = parse_therapy_areas(&read_config(areas_path)?, &areas_path.display().to_string())?;

        info!(
            "Loaded {} feed sources from {} and {} therapy areas from {}",
            sources.len(),
            sources_path.display(),
            therapy_areas.len(),
            areas_path.display()
        );

        Ok(Self::new(sources, therapy_areas))
    }

    /// Set the recency window. Negative windows, and windows reaching past
    /// the earliest date chrono can represent, are rejected.
    pub fn with_window_days(mut self, window_days: i64) -> Result<Self> {
        if window_days < 0 {
            let message = format!("must not be negative, got {}", window_days);
            return Err(config_error("window_days", message));
        }
        let representable = Duration::try_days(window_days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .is_some();
        if !representable {
            let message = format!("{} days is out of range", window_days);
            return Err(config_error("window_days", message));
        }
        self.window_days = window_days;
        Ok(self)
    }

    pub fn with_full_text(mut self, fetch_full_text: bool) -> Self {
        self.fetch_full_text = fetch_full_text;
        self
    }

    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn area_names(&self) -> Vec<&str> {
        self.therapy_areas.iter().map(|area| area.name.as_str()).collect()
    }

    pub fn therapy_area(&self, name: &str) -> Result<&TherapyArea> {
        self.therapy_areas
            .iter()
            .find(|area| area.name == name)
            .ok_or_else(|| DashboardError::UnknownArea {
                name: name.to_string(),
                available: self.area_names().into_iter().map(String::from).collect(),
            })
    }
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| config_error(&path.display().to_string(), e))
}

/// Parse `{"<source name>": "<feed url>", ...}`.
pub fn parse_sources(json: &str, origin: &str) -> Result<Vec<FeedSource>> {
    parse_object(json, origin)?
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(url) if is_http_url(&url) => Ok(FeedSource { name, url }),
            Value::String(url) => Err(config_error(
                origin,
                format!("source {:?} has an invalid feed URL {:?}", name, url),
            )),
            other => Err(config_error(
                origin,
                format!("source {:?} must map to a URL string, got {}", name, other),
            )),
        })
        .collect()
}

/// Parse `{"<area>": ["keyword", "multi word keyword"], ...}`.
pub fn parse_therapy_areas(json: &str, origin: &str) -> Result<Vec<TherapyArea>> {
    parse_object(json, origin)?
        .into_iter()
        .map(|(name, value)| {
            let keywords: Vec<String> = serde_json::from_value(value).map_err(|e| {
                config_error(origin, format!("area {:?} must map to a list of strings: {}", name, e))
            })?;
            Ok(TherapyArea { name, keywords })
        })
        .collect()
}

fn parse_object(json: &str, origin: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(json).map_err(|e| config_error(origin, e))
}

fn config_error(origin: &str, message: impl ToString) -> DashboardError {
    DashboardError::Config {
        path: origin.to_string(),
        message: message.to_string(),
    }
}
