use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Engagement, Interaction};
use crate::stores::{ContentStore, InteractionStore};

use super::interaction_weight;
use crate::models::InteractionKind;

/// Interaction tallies for a single content item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionCounts {
    pub likes: usize,
    pub comments: usize,
    pub shares: usize,
    pub ratings: Vec<u8>,
}

/// Popularity formula: weighted counts plus twice the mean rating.
///
/// Pure and total; an item with no interactions scores 0.
pub fn calculate_popularity(counts: &InteractionCounts) -> f64 {
    let avg_rating = if counts.ratings.is_empty() {
        0.0
    } else {
        let sum: f64 = counts.ratings.iter().map(|r| f64::from(*r)).sum();
        sum / counts.ratings.len() as f64
    };

    interaction_weight(InteractionKind::Like) * counts.likes as f64
        + interaction_weight(InteractionKind::Comment) * counts.comments as f64
        + interaction_weight(InteractionKind::Share) * counts.shares as f64
        + interaction_weight(InteractionKind::Rate) * avg_rating
}

/// Partitions an interaction history into per-kind tallies
pub fn tally_interactions(interactions: &[Interaction]) -> InteractionCounts {
    let mut counts = InteractionCounts::default();

    for interaction in interactions {
        match interaction.engagement {
            Engagement::Like => counts.likes += 1,
            Engagement::Comment => counts.comments += 1,
            Engagement::Share => counts.shares += 1,
            Engagement::Rate { rating } => counts.ratings.push(rating),
        }
    }

    counts
}

/// Recomputes and persists content popularity from interaction history.
///
/// Never triggered automatically by interaction recording; callers invoke it
/// explicitly (batch or per item).
pub struct PopularityService {
    contents: Arc<dyn ContentStore>,
    interactions: Arc<dyn InteractionStore>,
}

impl PopularityService {
    pub fn new(contents: Arc<dyn ContentStore>, interactions: Arc<dyn InteractionStore>) -> Self {
        Self {
            contents,
            interactions,
        }
    }

    /// Recomputes the popularity of `content_id`, floors it to an integer,
    /// persists it, and returns the new value
    pub async fn recompute(&self, content_id: Uuid) -> AppResult<i32> {
        self.contents
            .find_by_id(content_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

        let interactions = self.interactions.find_by_content(content_id).await?;
        let counts = tally_interactions(&interactions);
        let popularity = calculate_popularity(&counts).floor() as i32;

        self.contents.save_popularity(content_id, popularity).await?;

        tracing::info!(
            content_id = %content_id,
            popularity,
            interaction_count = interactions.len(),
            "Recomputed content popularity"
        );

        Ok(popularity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{MockContentStore, MockInteractionStore};
    use chrono::Utc;
    use mockall::predicate::eq;
    use crate::models::{Content, ContentType};

    fn counts(likes: usize, comments: usize, shares: usize, ratings: Vec<u8>) -> InteractionCounts {
        InteractionCounts {
            likes,
            comments,
            shares,
            ratings,
        }
    }

    fn content(id: Uuid) -> Content {
        Content {
            id,
            title: "A title".to_string(),
            content_type: ContentType::Article,
            tags: vec!["technology".to_string()],
            popularity: 0,
            created_at: Utc::now(),
        }
    }

    fn interaction(content_id: Uuid, engagement: Engagement) -> Interaction {
        Interaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            content_id,
            engagement,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_calculate_popularity_weighted_sum() {
        // 10*1 + 2*3 + 3*5 + avg(4,5)*2 = 10 + 6 + 15 + 9 = 40
        let result = calculate_popularity(&counts(10, 2, 3, vec![4, 5]));
        assert_eq!(result, 40.0);
    }

    #[test]
    fn test_calculate_popularity_empty_is_zero() {
        assert_eq!(calculate_popularity(&counts(0, 0, 0, vec![])), 0.0);
    }

    #[test]
    fn test_calculate_popularity_no_ratings() {
        // Mean of an empty rating list contributes nothing
        assert_eq!(calculate_popularity(&counts(2, 1, 0, vec![])), 5.0);
    }

    #[test]
    fn test_tally_interactions_partitions_by_kind() {
        let content_id = Uuid::new_v4();
        let interactions = vec![
            interaction(content_id, Engagement::Like),
            interaction(content_id, Engagement::Like),
            interaction(content_id, Engagement::Comment),
            interaction(content_id, Engagement::Share),
            interaction(content_id, Engagement::Rate { rating: 3 }),
            interaction(content_id, Engagement::Rate { rating: 5 }),
        ];

        let tallied = tally_interactions(&interactions);
        assert_eq!(tallied, counts(2, 1, 1, vec![3, 5]));
    }

    #[tokio::test]
    async fn test_recompute_floors_and_persists() {
        let content_id = Uuid::new_v4();

        let mut contents = MockContentStore::new();
        contents
            .expect_find_by_id()
            .with(eq(content_id))
            .returning(move |id| Ok(Some(content(id))));
        // 1*1 + avg(1,1,2)*2 = 1 + 2.666.. -> floors to 3
        contents
            .expect_save_popularity()
            .with(eq(content_id), eq(3))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut interactions = MockInteractionStore::new();
        interactions.expect_find_by_content().returning(move |_| {
            Ok(vec![
                interaction(content_id, Engagement::Like),
                interaction(content_id, Engagement::Rate { rating: 1 }),
                interaction(content_id, Engagement::Rate { rating: 1 }),
                interaction(content_id, Engagement::Rate { rating: 2 }),
            ])
        });

        let service = PopularityService::new(Arc::new(contents), Arc::new(interactions));
        let popularity = service.recompute(content_id).await.unwrap();
        assert_eq!(popularity, 3);
    }

    #[tokio::test]
    async fn test_recompute_unknown_content_is_not_found() {
        let mut contents = MockContentStore::new();
        contents.expect_find_by_id().returning(|_| Ok(None));

        let interactions = MockInteractionStore::new();

        let service = PopularityService::new(Arc::new(contents), Arc::new(interactions));
        let err = service.recompute(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
