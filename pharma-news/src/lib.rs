pub mod aggregator;
pub mod aggregators;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod recency;
pub mod render;
pub mod sanitize;
pub mod traits;
pub mod types;
pub mod utils;

pub use aggregator::NewsAggregator;
pub use aggregators::group;
pub use classifier::matches;
pub use config::DashboardConfig;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use recency::is_recent;
pub use sanitize::sanitize;
pub use traits::PageSource;
pub use types::*;
pub use utils::text::normalize;
