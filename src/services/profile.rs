use std::collections::HashMap;

use crate::models::{InteractionWithContent, User};

use super::interaction_weight;

/// Flat boost added to every tag the user declared as a preference
const PREFERENCE_BOOST: f64 = 5.0;

/// Derives a sparse tag -> affinity score map from a user's interaction
/// history and declared preferences.
///
/// Each interaction contributes its kind weight plus its rating (when
/// present) to every tag on the target content, undivided. Declared
/// preferences then add a flat boost whether or not the tag already scored.
/// Tags absent from the map implicitly score 0.
pub fn build_tag_profile(
    user: &User,
    interactions: &[InteractionWithContent],
) -> HashMap<String, f64> {
    let mut scores: HashMap<String, f64> = HashMap::new();

    for item in interactions {
        let engagement = &item.interaction.engagement;
        let weight = interaction_weight(engagement.kind())
            + engagement.rating().map_or(0.0, f64::from);

        for tag in &item.content.tags {
            *scores.entry(tag.clone()).or_insert(0.0) += weight;
        }
    }

    for tag in &user.preferences {
        *scores.entry(tag.clone()).or_insert(0.0) += PREFERENCE_BOOST;
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, ContentType, Engagement, Interaction};
    use chrono::Utc;
    use uuid::Uuid;

    fn user_with_preferences(preferences: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            username: "robin".to_string(),
            preferences: preferences.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    fn interaction_on(tags: &[&str], engagement: Engagement) -> InteractionWithContent {
        let content_id = Uuid::new_v4();
        InteractionWithContent {
            interaction: Interaction {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                content_id,
                engagement,
                created_at: Utc::now(),
            },
            content: Content {
                id: content_id,
                title: "Tagged content".to_string(),
                content_type: ContentType::Article,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                popularity: 0,
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_profile_combines_interactions_and_preferences() {
        let user = user_with_preferences(&["education", "health"]);
        let interactions = vec![interaction_on(&["education", "food"], Engagement::Like)];

        let profile = build_tag_profile(&user, &interactions);

        // liked tag also declared as preference: 1 + 5
        assert_eq!(profile["education"], 6.0);
        // liked tag only
        assert_eq!(profile["food"], 1.0);
        // preference only
        assert_eq!(profile["health"], 5.0);
        assert_eq!(profile.len(), 3);
    }

    #[test]
    fn test_rating_adds_to_kind_weight() {
        let user = user_with_preferences(&[]);
        let interactions = vec![interaction_on(
            &["sports"],
            Engagement::Rate { rating: 4 },
        )];

        let profile = build_tag_profile(&user, &interactions);

        // rate weight 2 + rating 4
        assert_eq!(profile["sports"], 6.0);
    }

    #[test]
    fn test_weight_applies_in_full_to_every_tag() {
        let user = user_with_preferences(&[]);
        let interactions = vec![interaction_on(
            &["business", "technology"],
            Engagement::Share,
        )];

        let profile = build_tag_profile(&user, &interactions);

        assert_eq!(profile["business"], 5.0);
        assert_eq!(profile["technology"], 5.0);
    }

    #[test]
    fn test_scores_accumulate_across_interactions() {
        let user = user_with_preferences(&[]);
        let interactions = vec![
            interaction_on(&["travel"], Engagement::Like),
            interaction_on(&["travel"], Engagement::Comment),
        ];

        let profile = build_tag_profile(&user, &interactions);

        assert_eq!(profile["travel"], 4.0);
    }

    #[test]
    fn test_empty_history_yields_preference_only_profile() {
        let user = user_with_preferences(&["food"]);

        let profile = build_tag_profile(&user, &[]);

        assert_eq!(profile["food"], 5.0);
        assert_eq!(profile.len(), 1);
    }
}
