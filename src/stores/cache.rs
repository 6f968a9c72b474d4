use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use std::fmt::Display;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Content;

/// Key for one cached recommendation page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecommendationKey {
    pub user_id: Uuid,
    pub page: u32,
    pub page_size: u32,
}

impl RecommendationKey {
    pub fn new(user_id: Uuid, page: u32, page_size: u32) -> Self {
        Self {
            user_id,
            page,
            page_size,
        }
    }
}

impl Display for RecommendationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "recommendations:{}:{}:{}",
            self.user_id, self.page, self.page_size
        )
    }
}

/// Cache-aside storage for ranked recommendation pages.
///
/// There is no invalidation hook: entries written here go stale when
/// interactions or popularity change underneath them, and are only ever
/// replaced by TTL expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationCache: Send + Sync {
    async fn get(&self, key: &RecommendationKey) -> AppResult<Option<Vec<Content>>>;
    async fn set(
        &self,
        key: &RecommendationKey,
        value: &[Content],
        ttl_seconds: u64,
    ) -> AppResult<()>;
}

/// Redis-backed implementation storing each page as a JSON string
pub struct RedisRecommendationCache {
    client: Client,
}

impl RedisRecommendationCache {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecommendationCache for RedisRecommendationCache {
    async fn get(&self, key: &RecommendationKey) -> AppResult<Option<Vec<Content>>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let page = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(page))
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &RecommendationKey,
        value: &[Content],
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key.to_string(), json, ttl_seconds).await?;

        tracing::debug!(key = %key, ttl = ttl_seconds, "Cached recommendation page");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_key_display() {
        let user_id = Uuid::nil();
        let key = RecommendationKey::new(user_id, 2, 10);
        assert_eq!(
            key.to_string(),
            format!("recommendations:{}:2:10", user_id)
        );
    }

    #[test]
    fn test_recommendation_key_distinguishes_pagination() {
        let user_id = Uuid::nil();
        let a = RecommendationKey::new(user_id, 1, 10);
        let b = RecommendationKey::new(user_id, 1, 20);
        assert_ne!(a.to_string(), b.to_string());
    }
}
