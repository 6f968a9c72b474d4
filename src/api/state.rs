use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    CandidateSelector, InteractionService, PopularityService, RecommendationService,
};
use crate::stores::{ContentStore, InteractionStore, RecommendationCache, UserStore};

/// Shared application state threaded through the router.
///
/// Stores and the cache come in as explicit dependencies so tests can
/// substitute deterministic fakes for Postgres and Redis.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub contents: Arc<dyn ContentStore>,
    pub interactions: Arc<InteractionService>,
    pub popularity: Arc<PopularityService>,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        contents: Arc<dyn ContentStore>,
        interactions: Arc<dyn InteractionStore>,
        cache: Arc<dyn RecommendationCache>,
    ) -> Self {
        let interaction_service = Arc::new(InteractionService::new(
            users.clone(),
            contents.clone(),
            interactions.clone(),
        ));
        let popularity = Arc::new(PopularityService::new(
            contents.clone(),
            interactions.clone(),
        ));
        let selector = CandidateSelector::new(contents.clone(), interactions.clone());
        let recommendations = Arc::new(RecommendationService::new(
            users.clone(),
            interactions,
            selector,
            cache,
            config.recommendations_cache_ttl,
            config.candidate_lookback_days,
        ));

        Self {
            config,
            users,
            contents,
            interactions: interaction_service,
            popularity,
            recommendations,
        }
    }
}
