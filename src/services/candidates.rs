use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Content;
use crate::stores::{ContentFilter, ContentStore, InteractionStore};

/// Selects recommendation candidates: content created inside the lookback
/// window that the user has never interacted with.
pub struct CandidateSelector {
    contents: Arc<dyn ContentStore>,
    interactions: Arc<dyn InteractionStore>,
}

impl CandidateSelector {
    pub fn new(contents: Arc<dyn ContentStore>, interactions: Arc<dyn InteractionStore>) -> Self {
        Self {
            contents,
            interactions,
        }
    }

    /// Fresh, unseen content for `user_id`, newest first.
    ///
    /// "Seen" means any interaction of any kind, over the user's entire
    /// history; only the candidate side is bounded by the lookback window.
    pub async fn find_fresh_unseen(
        &self,
        user_id: Uuid,
        lookback_days: i64,
    ) -> AppResult<Vec<Content>> {
        let seen: HashSet<Uuid> = self
            .interactions
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|item| item.interaction.content_id)
            .collect();

        let cutoff = Utc::now() - Duration::days(lookback_days);
        let filter = ContentFilter {
            created_after: Some(cutoff),
            exclude_ids: if seen.is_empty() {
                None
            } else {
                Some(seen.into_iter().collect())
            },
            ..Default::default()
        };

        self.contents.find_many(filter, 0, None).await
    }
}
