use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::Content;

/// Peak recency bonus, awarded to content created at evaluation time
const FRESHNESS_SCALE: f64 = 10.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Scores a candidate against a tag profile: accumulated affinity for its
/// tags plus a freshness boost that decays with age.
///
/// Absolute, not normalized; monotonic in both tag affinity and recency.
pub fn score_content(
    content: &Content,
    profile: &HashMap<String, f64>,
    now: DateTime<Utc>,
) -> f64 {
    let tag_score: f64 = content
        .tags
        .iter()
        .filter_map(|tag| profile.get(tag))
        .sum();

    let age_days =
        (now - content.created_at).num_milliseconds().max(0) as f64 / MILLIS_PER_DAY;
    let freshness_boost = FRESHNESS_SCALE / (1.0 + age_days);

    tag_score + freshness_boost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use chrono::Duration;
    use uuid::Uuid;

    fn content_with(tags: &[&str], age: Duration, now: DateTime<Utc>) -> Content {
        Content {
            id: Uuid::new_v4(),
            title: "Scored".to_string(),
            content_type: ContentType::Podcast,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            popularity: 0,
            created_at: now - age,
        }
    }

    fn profile(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(tag, score)| (tag.to_string(), *score))
            .collect()
    }

    #[test]
    fn test_tag_scores_sum_over_content_tags() {
        let now = Utc::now();
        let content = content_with(&["education", "health"], Duration::days(1), now);
        let profile = profile(&[("education", 6.0), ("health", 5.0), ("food", 9.0)]);

        let score = score_content(&content, &profile, now);

        // 11 affinity + 10/(1+1) freshness
        assert_eq!(score, 16.0);
    }

    #[test]
    fn test_unprofiled_tags_score_zero() {
        let now = Utc::now();
        let content = content_with(&["travel"], Duration::zero(), now);

        let score = score_content(&content, &HashMap::new(), now);

        // freshness boost only, at its peak
        assert_eq!(score, 10.0);
    }

    #[test]
    fn test_fresher_content_outscores_older_on_tag_ties() {
        let now = Utc::now();
        let profile = profile(&[("sports", 3.0)]);
        let fresh = content_with(&["sports"], Duration::days(1), now);
        let stale = content_with(&["sports"], Duration::days(20), now);

        assert!(
            score_content(&fresh, &profile, now) > score_content(&stale, &profile, now)
        );
    }

    #[test]
    fn test_age_is_fractional() {
        let now = Utc::now();
        let half_day_old = content_with(&[], Duration::hours(12), now);

        let score = score_content(&half_day_old, &HashMap::new(), now);

        // 10 / 1.5
        assert!((score - 6.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_future_created_at_clamps_to_zero_age() {
        let now = Utc::now();
        let future = content_with(&[], Duration::days(-2), now);

        let score = score_content(&future, &HashMap::new(), now);

        assert_eq!(score, 10.0);
    }
}
