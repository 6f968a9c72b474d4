use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Content, ContentType, Interaction, InteractionKind, NewContent, NewUser, User,
};
use crate::services::recommendations::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::stores::ContentFilter;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub preferences: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub preferences: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            preferences: user.preferences.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub tags: Vec<String>,
    pub popularity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Content> for ContentResponse {
    fn from(content: &Content) -> Self {
        Self {
            id: content.id,
            title: content.title.clone(),
            content_type: content.content_type,
            tags: content.tags.clone(),
            popularity: content.popularity,
            created_at: content.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentFilterQuery {
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
    /// Comma-separated list of tags; any overlap matches
    pub tags: Option<String>,
    pub page: Option<u32>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionRequest {
    pub user_id: Uuid,
    pub content_id: Uuid,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub rating: Option<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl From<&Interaction> for InteractionResponse {
    fn from(interaction: &Interaction) -> Self {
        Self {
            id: interaction.id,
            user_id: interaction.user_id,
            content_id: interaction.content_id,
            kind: interaction.engagement.kind(),
            rating: interaction.engagement.rating(),
            created_at: interaction.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn require_positive(value: u32, field: &str) -> AppResult<u32> {
    if value == 0 {
        return Err(AppError::InvalidInput(format!(
            "{} must be at least 1",
            field
        )));
    }
    Ok(value)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    if request.username.trim().is_empty() {
        return Err(AppError::InvalidInput("Username is required".to_string()));
    }
    if request.preferences.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one preference is required".to_string(),
        ));
    }

    let user = state
        .users
        .create(NewUser {
            username: request.username,
            preferences: request.preferences,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// List the identifiers of all users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<Uuid>>> {
    let ids = state.users.list_ids().await?;
    Ok(Json(ids))
}

/// Create a new content item
pub async fn create_content(
    State(state): State<AppState>,
    Json(request): Json<CreateContentRequest>,
) -> AppResult<(StatusCode, Json<ContentResponse>)> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()));
    }
    if request.tags.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one tag is required".to_string(),
        ));
    }

    let content = state
        .contents
        .create(NewContent {
            title: request.title,
            content_type: request.content_type,
            tags: request.tags,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ContentResponse::from(&content))))
}

/// Filtered, paginated content listing, newest first
pub async fn filter_contents(
    State(state): State<AppState>,
    Query(query): Query<ContentFilterQuery>,
) -> AppResult<Json<Vec<ContentResponse>>> {
    let page = require_positive(query.page.unwrap_or(1), "page")?;
    let page_size = require_positive(query.page_size.unwrap_or(10), "pageSize")?;

    let tags_any_of = query
        .tags
        .map(|tags| {
            tags.split(',')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|tags| !tags.is_empty());

    let filter = ContentFilter {
        content_type: query.content_type,
        tags_any_of,
        ..Default::default()
    };

    let offset = i64::from(page - 1) * i64::from(page_size);
    let contents = state
        .contents
        .find_many(filter, offset, Some(i64::from(page_size)))
        .await?;

    Ok(Json(contents.iter().map(ContentResponse::from).collect()))
}

/// Delete a content item
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.contents.delete(id).await? {
        return Err(AppError::NotFound("Content not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Recompute a content item's popularity from its interaction history.
/// This is the only popularity trigger; recording interactions never
/// updates the score implicitly.
pub async fn recompute_popularity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let popularity = state.popularity.recompute(id).await?;
    Ok(Json(json!({ "popularity": popularity })))
}

/// Record a single interaction
pub async fn create_interaction(
    State(state): State<AppState>,
    Json(request): Json<CreateInteractionRequest>,
) -> AppResult<(StatusCode, Json<InteractionResponse>)> {
    let interaction = state
        .interactions
        .record(
            request.user_id,
            request.content_id,
            request.kind,
            request.rating,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InteractionResponse::from(&interaction)),
    ))
}

/// Ranked recommendation page for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RecommendationsQuery>,
) -> AppResult<Json<Vec<ContentResponse>>> {
    let page = require_positive(query.page.unwrap_or(DEFAULT_PAGE), "page")?;
    let page_size = require_positive(query.limit.unwrap_or(DEFAULT_PAGE_SIZE), "limit")?;

    let recommendations = state
        .recommendations
        .get_recommendations(user_id, page, page_size)
        .await?;

    Ok(Json(
        recommendations.iter().map(ContentResponse::from).collect(),
    ))
}
