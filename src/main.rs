use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use curator_api::api::{create_router, AppState};
use curator_api::config::Config;
use curator_api::db;
use curator_api::stores::{
    PgContentStore, PgInteractionStore, PgUserStore, RedisRecommendationCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let pool = db::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;

    let redis_client = db::create_redis_client(&config.redis_url)?;

    let state = AppState::new(
        config,
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgContentStore::new(pool.clone())),
        Arc::new(PgInteractionStore::new(pool)),
        Arc::new(RedisRecommendationCache::new(redis_client)),
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
