use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Content, Engagement, Interaction, InteractionKind, InteractionWithContent,
};

/// Read/write access to interaction events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Inserts a new interaction. A concurrent duplicate that slips past the
    /// service-level existence check trips the store's uniqueness constraint
    /// and surfaces as `Conflict`.
    async fn create(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        engagement: Engagement,
    ) -> AppResult<Interaction>;
    async fn find_one(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        kind: InteractionKind,
    ) -> AppResult<Option<Interaction>>;
    /// Every interaction the user has performed, with the target content
    /// joined in
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<InteractionWithContent>>;
    async fn find_by_content(&self, content_id: Uuid) -> AppResult<Vec<Interaction>>;
}

pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct InteractionRow {
    id: Uuid,
    user_id: Uuid,
    content_id: Uuid,
    kind: String,
    rating: Option<i16>,
    created_at: DateTime<Utc>,
}

fn engagement_from_columns(kind: &str, rating: Option<i16>) -> AppResult<Engagement> {
    let kind = kind.parse::<InteractionKind>().map_err(AppError::Internal)?;

    match kind {
        InteractionKind::Like => Ok(Engagement::Like),
        InteractionKind::Comment => Ok(Engagement::Comment),
        InteractionKind::Share => Ok(Engagement::Share),
        InteractionKind::Rate => {
            let rating = rating
                .and_then(|r| u8::try_from(r).ok())
                .ok_or_else(|| {
                    AppError::Internal("rate interaction stored without a valid rating".to_string())
                })?;
            Ok(Engagement::Rate { rating })
        }
    }
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = AppError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let engagement = engagement_from_columns(&row.kind, row.rating)?;

        Ok(Interaction {
            id: row.id,
            user_id: row.user_id,
            content_id: row.content_id,
            engagement,
            created_at: row.created_at,
        })
    }
}

/// Joined row used by `find_by_user`; content columns are aliased `c_*`
#[derive(sqlx::FromRow)]
struct InteractionContentRow {
    id: Uuid,
    user_id: Uuid,
    content_id: Uuid,
    kind: String,
    rating: Option<i16>,
    created_at: DateTime<Utc>,
    c_title: String,
    c_content_type: String,
    c_tags: Vec<String>,
    c_popularity: i32,
    c_created_at: DateTime<Utc>,
}

impl TryFrom<InteractionContentRow> for InteractionWithContent {
    type Error = AppError;

    fn try_from(row: InteractionContentRow) -> Result<Self, Self::Error> {
        let engagement = engagement_from_columns(&row.kind, row.rating)?;
        let content_type = row
            .c_content_type
            .parse()
            .map_err(AppError::Internal)?;

        Ok(InteractionWithContent {
            interaction: Interaction {
                id: row.id,
                user_id: row.user_id,
                content_id: row.content_id,
                engagement,
                created_at: row.created_at,
            },
            content: Content {
                id: row.content_id,
                title: row.c_title,
                content_type,
                tags: row.c_tags,
                popularity: row.c_popularity,
                created_at: row.c_created_at,
            },
        })
    }
}

#[async_trait]
impl InteractionStore for PgInteractionStore {
    async fn create(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        engagement: Engagement,
    ) -> AppResult<Interaction> {
        let rating = engagement.rating().map(i16::from);

        let row = sqlx::query_as::<_, InteractionRow>(
            r#"
            INSERT INTO interactions (user_id, content_id, kind, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, content_id, kind, rating, created_at
            "#,
        )
        .bind(user_id)
        .bind(content_id)
        .bind(engagement.kind().as_str())
        .bind(rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                "Interaction of this type already exists for this user and content".to_string(),
            ),
            _ => AppError::Database(e),
        })?;

        row.try_into()
    }

    async fn find_one(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        kind: InteractionKind,
    ) -> AppResult<Option<Interaction>> {
        let row = sqlx::query_as::<_, InteractionRow>(
            "SELECT id, user_id, content_id, kind, rating, created_at \
             FROM interactions \
             WHERE user_id = $1 AND content_id = $2 AND kind = $3",
        )
        .bind(user_id)
        .bind(content_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Interaction::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<InteractionWithContent>> {
        let rows = sqlx::query_as::<_, InteractionContentRow>(
            r#"
            SELECT i.id, i.user_id, i.content_id, i.kind, i.rating, i.created_at,
                   c.title AS c_title, c.content_type AS c_content_type,
                   c.tags AS c_tags, c.popularity AS c_popularity,
                   c.created_at AS c_created_at
            FROM interactions i
            JOIN contents c ON c.id = i.content_id
            WHERE i.user_id = $1
            ORDER BY i.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(InteractionWithContent::try_from)
            .collect()
    }

    async fn find_by_content(&self, content_id: Uuid) -> AppResult<Vec<Interaction>> {
        let rows = sqlx::query_as::<_, InteractionRow>(
            "SELECT id, user_id, content_id, kind, rating, created_at \
             FROM interactions WHERE content_id = $1 ORDER BY created_at",
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Interaction::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_from_columns_plain_kinds() {
        assert_eq!(
            engagement_from_columns("like", None).unwrap(),
            Engagement::Like
        );
        assert_eq!(
            engagement_from_columns("share", None).unwrap(),
            Engagement::Share
        );
    }

    #[test]
    fn test_engagement_from_columns_rate_carries_rating() {
        assert_eq!(
            engagement_from_columns("rate", Some(4)).unwrap(),
            Engagement::Rate { rating: 4 }
        );
    }

    #[test]
    fn test_engagement_from_columns_rejects_rate_without_rating() {
        assert!(engagement_from_columns("rate", None).is_err());
    }

    #[test]
    fn test_engagement_from_columns_rejects_unknown_kind() {
        assert!(engagement_from_columns("bookmark", None).is_err());
    }
}
