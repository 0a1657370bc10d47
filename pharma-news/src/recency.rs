use crate::types::Article;
use chrono::{DateTime, Duration, Utc};

/// True when `published_at` is no older than `window` at `now`.
///
/// The boundary is inclusive and future dates are accepted.
pub fn is_within_window(
    published_at: DateTime<Utc>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    now.signed_duration_since(published_at) <= window
}

pub fn is_recent(article: &Article, now: DateTime<Utc>, window_days: i64) -> bool {
    is_within_window(article.published_at, now, window(window_days))
}

/// `window_days` as a duration, clamped to the range chrono can represent.
pub fn window(window_days: i64) -> Duration {
    Duration::try_days(window_days).unwrap_or(if window_days < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    })
}

/// Oldest timestamp kept by a cycle that started at `now`, saturating at
/// the earliest representable instant.
pub fn cutoff(now: DateTime<Utc>, window_days: i64) -> DateTime<Utc> {
    now.checked_sub_signed(window(window_days))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
