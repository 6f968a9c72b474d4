pub mod cache;
pub mod content;
pub mod interaction;
pub mod user;

pub use cache::{RecommendationCache, RecommendationKey, RedisRecommendationCache};
pub use content::{ContentFilter, ContentStore, PgContentStore};
pub use interaction::{InteractionStore, PgInteractionStore};
pub use user::{PgUserStore, UserStore};

#[cfg(test)]
pub use cache::MockRecommendationCache;
#[cfg(test)]
pub use content::MockContentStore;
#[cfg(test)]
pub use interaction::MockInteractionStore;
#[cfg(test)]
pub use user::MockUserStore;
