use crate::classifier::{Classifier, NormalizedText};
use crate::types::{Article, GroupedArticles, TherapyArea};
use tracing::{debug, info};

/// Partition `articles` into one bucket per therapy area.
///
/// Every area gets a bucket, even when nothing matches it. Articles keep
/// their discovery order and are copied into every area they match.
pub fn group(articles: &[Article], areas: &[TherapyArea]) -> GroupedArticles {
    let classifiers: Vec<Classifier> = areas.iter().map(Classifier::new).collect();
    let mut grouped = GroupedArticles::with_areas(areas.iter().map(|area| area.name.as_str()));

    for article in articles {
        let text = NormalizedText::new(&article.searchable_text());

        for (index, classifier) in classifiers.iter().enumerate() {
            if !classifier.matches(&text) {
                continue;
            }
            debug!("{:?} matches {}", article.title, classifier.area());
            if let Some(bucket) = grouped.bucket_mut(index) {
                bucket.push(article.clone());
            }
        }
    }

    for bucket in grouped.iter() {
        info!("Therapy area {}: {} articles", bucket.area, bucket.articles.len());
    }

    grouped
}
