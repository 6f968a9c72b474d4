use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Content, ContentType, NewContent};

/// Filter applied when listing content. All conditions are conjunctive;
/// results are always ordered by creation time, newest first.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub content_type: Option<ContentType>,
    pub tags_any_of: Option<Vec<String>>,
    pub created_after: Option<DateTime<Utc>>,
    pub exclude_ids: Option<Vec<Uuid>>,
}

/// Read/write access to content records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create(&self, new: NewContent) -> AppResult<Content>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Content>>;
    /// Matching rows ordered `created_at DESC`. `limit: None` returns the
    /// whole matching set (candidate selection ranks before paginating).
    async fn find_many(
        &self,
        filter: ContentFilter,
        offset: i64,
        limit: Option<i64>,
    ) -> AppResult<Vec<Content>>;
    /// Persists a recomputed popularity score onto the content record
    async fn save_popularity(&self, id: Uuid, popularity: i32) -> AppResult<()>;
    /// Returns false if no such content existed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    title: String,
    content_type: String,
    tags: Vec<String>,
    popularity: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for Content {
    type Error = AppError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let content_type = row
            .content_type
            .parse::<ContentType>()
            .map_err(AppError::Internal)?;

        Ok(Content {
            id: row.id,
            title: row.title,
            content_type,
            tags: row.tags,
            popularity: row.popularity,
            created_at: row.created_at,
        })
    }
}

const CONTENT_COLUMNS: &str = "id, title, content_type, tags, popularity, created_at";

#[async_trait]
impl ContentStore for PgContentStore {
    async fn create(&self, new: NewContent) -> AppResult<Content> {
        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            INSERT INTO contents (title, content_type, tags)
            VALUES ($1, $2, $3)
            RETURNING id, title, content_type, tags, popularity, created_at
            "#,
        )
        .bind(&new.title)
        .bind(new.content_type.as_str())
        .bind(&new.tags)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Content>> {
        let row = sqlx::query_as::<_, ContentRow>(
            "SELECT id, title, content_type, tags, popularity, created_at \
             FROM contents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Content::try_from).transpose()
    }

    async fn find_many(
        &self,
        filter: ContentFilter,
        offset: i64,
        limit: Option<i64>,
    ) -> AppResult<Vec<Content>> {
        let mut query = QueryBuilder::new(format!("SELECT {} FROM contents", CONTENT_COLUMNS));
        query.push(" WHERE true");

        if let Some(content_type) = filter.content_type {
            query.push(" AND content_type = ");
            query.push_bind(content_type.as_str());
        }
        if let Some(tags) = &filter.tags_any_of {
            if !tags.is_empty() {
                // array overlap: any shared tag matches
                query.push(" AND tags && ");
                query.push_bind(tags.clone());
            }
        }
        if let Some(created_after) = filter.created_after {
            query.push(" AND created_at >= ");
            query.push_bind(created_after);
        }
        if let Some(exclude_ids) = &filter.exclude_ids {
            if !exclude_ids.is_empty() {
                query.push(" AND NOT (id = ANY(");
                query.push_bind(exclude_ids.clone());
                query.push("))");
            }
        }

        query.push(" ORDER BY created_at DESC");
        if let Some(limit) = limit {
            query.push(" LIMIT ");
            query.push_bind(limit);
        }
        if offset > 0 {
            query.push(" OFFSET ");
            query.push_bind(offset);
        }

        let rows: Vec<ContentRow> = query.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(Content::try_from).collect()
    }

    async fn save_popularity(&self, id: Uuid, popularity: i32) -> AppResult<()> {
        let result = sqlx::query("UPDATE contents SET popularity = $2 WHERE id = $1")
            .bind(id)
            .bind(popularity)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Content not found".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
