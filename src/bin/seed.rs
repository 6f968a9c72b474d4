use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use curator_api::config::Config;
use curator_api::db;
use curator_api::error::AppError;
use curator_api::models::{ContentType, InteractionKind, NewUser};
use curator_api::services::InteractionService;
use curator_api::stores::{PgContentStore, PgInteractionStore, PgUserStore, UserStore};

const USER_COUNT: usize = 50;
const CONTENT_COUNT: usize = 500;
const INTERACTION_ATTEMPTS: usize = 5000;

const TAG_POOL: &[&str] = &[
    "technology",
    "business",
    "education",
    "health",
    "sports",
    "food",
    "entertainment",
    "travel",
];

const CONTENT_TYPES: &[ContentType] = &[
    ContentType::Article,
    ContentType::Video,
    ContentType::Podcast,
];

const INTERACTION_KINDS: &[InteractionKind] = &[
    InteractionKind::Like,
    InteractionKind::Comment,
    InteractionKind::Share,
    InteractionKind::Rate,
];

const TITLE_LEADS: &[&str] = &[
    "Getting started with",
    "A field guide to",
    "Why everyone is talking about",
    "The quiet rise of",
    "Five lessons from",
    "Rethinking",
    "A beginner's look at",
    "What nobody tells you about",
];

const TITLE_TOPICS: &[&str] = &[
    "urban gardening",
    "interval training",
    "sourdough baking",
    "remote work",
    "trail running",
    "personal finance",
    "street photography",
    "language learning",
    "home automation",
    "slow travel",
];

fn pick<'a, T>(rng: &mut StdRng, pool: &'a [T]) -> &'a T {
    pool.choose(rng).expect("pool is non-empty")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;

    let users = Arc::new(PgUserStore::new(pool.clone()));
    let contents = Arc::new(PgContentStore::new(pool.clone()));
    let interactions = Arc::new(PgInteractionStore::new(pool.clone()));
    let recorder = InteractionService::new(users.clone(), contents.clone(), interactions);

    let mut rng = StdRng::from_entropy();

    tracing::info!("Seeding data...");

    let mut user_ids = Vec::with_capacity(USER_COUNT);
    for i in 0..USER_COUNT {
        let preferences = TAG_POOL
            .choose_multiple(&mut rng, 3)
            .map(|tag| tag.to_string())
            .collect();
        let user = users
            .create(NewUser {
                username: format!("user_{:03}", i),
                preferences,
            })
            .await?;
        user_ids.push(user.id);
    }
    tracing::info!(count = user_ids.len(), "Seeded users");

    // Inserted directly so creation timestamps spread across the lookback
    // window instead of clustering at "now"
    let mut content_ids = Vec::with_capacity(CONTENT_COUNT);
    for _ in 0..CONTENT_COUNT {
        let title = format!(
            "{} {}",
            pick(&mut rng, TITLE_LEADS),
            pick(&mut rng, TITLE_TOPICS)
        );
        let content_type = *pick(&mut rng, CONTENT_TYPES);
        let tags: Vec<String> = TAG_POOL
            .choose_multiple(&mut rng, 2)
            .map(|tag| tag.to_string())
            .collect();
        let created_at = Utc::now() - Duration::minutes(rng.gen_range(0..30 * 24 * 60));

        let id: uuid::Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO contents (title, content_type, tags, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&title)
        .bind(content_type.as_str())
        .bind(&tags)
        .bind(created_at)
        .fetch_one(&pool)
        .await?;
        content_ids.push(id);
    }
    tracing::info!(count = content_ids.len(), "Seeded contents");

    let mut recorded = 0usize;
    for _ in 0..INTERACTION_ATTEMPTS {
        let user_id = *pick(&mut rng, &user_ids);
        let content_id = *pick(&mut rng, &content_ids);
        let kind = *pick(&mut rng, INTERACTION_KINDS);
        let rating = matches!(kind, InteractionKind::Rate).then(|| rng.gen_range(1..=5));

        match recorder.record(user_id, content_id, kind, rating).await {
            Ok(_) => recorded += 1,
            // random picks collide; the uniqueness rule drops repeats
            Err(AppError::Conflict(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    tracing::info!(recorded, "Seeded interactions");

    Ok(())
}
