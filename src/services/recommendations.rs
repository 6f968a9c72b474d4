use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Content;
use crate::stores::{InteractionStore, RecommendationCache, RecommendationKey, UserStore};

use super::candidates::CandidateSelector;
use super::profile::build_tag_profile;
use super::scoring::score_content;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// End-to-end recommendation pipeline behind a read-through cache.
///
/// On a miss the full candidate set is scored eagerly in memory and the
/// requested page is sliced off after ranking; nothing streams or
/// terminates early.
pub struct RecommendationService {
    users: Arc<dyn UserStore>,
    interactions: Arc<dyn InteractionStore>,
    selector: CandidateSelector,
    cache: Arc<dyn RecommendationCache>,
    cache_ttl_seconds: u64,
    lookback_days: i64,
}

impl RecommendationService {
    pub fn new(
        users: Arc<dyn UserStore>,
        interactions: Arc<dyn InteractionStore>,
        selector: CandidateSelector,
        cache: Arc<dyn RecommendationCache>,
        cache_ttl_seconds: u64,
        lookback_days: i64,
    ) -> Self {
        Self {
            users,
            interactions,
            selector,
            cache,
            cache_ttl_seconds,
            lookback_days,
        }
    }

    /// Returns the ranked recommendation page for a user.
    ///
    /// A cache hit is returned verbatim and skips every downstream read; a
    /// cache failure (read or write) aborts the request rather than falling
    /// back to an uncached computation.
    pub async fn get_recommendations(
        &self,
        user_id: Uuid,
        page: u32,
        page_size: u32,
    ) -> AppResult<Vec<Content>> {
        let key = RecommendationKey::new(user_id, page, page_size);

        if let Some(cached) = self.cache.get(&key).await? {
            tracing::debug!(user_id = %user_id, page, page_size, "Recommendation cache hit");
            return Ok(cached);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let history = self.interactions.find_by_user(user_id).await?;
        let profile = build_tag_profile(&user, &history);

        let candidates = self
            .selector
            .find_fresh_unseen(user_id, self.lookback_days)
            .await?;
        let candidate_count = candidates.len();

        let now = Utc::now();
        let mut scored: Vec<(f64, Content)> = candidates
            .into_iter()
            .map(|content| (score_content(&content, &profile, now), content))
            .collect();

        // stable sort: equal scores keep the selector's newest-first order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let start = (u64::from(page) - 1) * u64::from(page_size);
        let page_items: Vec<Content> = scored
            .into_iter()
            .map(|(_, content)| content)
            .skip(start as usize)
            .take(page_size as usize)
            .collect();

        self.cache
            .set(&key, &page_items, self.cache_ttl_seconds)
            .await?;

        tracing::info!(
            user_id = %user_id,
            page,
            page_size,
            candidate_count,
            returned = page_items.len(),
            "Computed recommendation page"
        );

        Ok(page_items)
    }
}
