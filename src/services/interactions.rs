use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Engagement, Interaction, InteractionKind, InteractionWithContent,
};
use crate::stores::{ContentStore, InteractionStore, UserStore};

/// Validates and records interaction events.
///
/// Recording never updates popularity; that stays a separate, explicitly
/// invoked operation.
pub struct InteractionService {
    users: Arc<dyn UserStore>,
    contents: Arc<dyn ContentStore>,
    interactions: Arc<dyn InteractionStore>,
}

/// Validates the type-dependent payload shape: a rating is required for
/// `rate` (and must lie in 1..=5), and is dropped for every other kind.
fn build_engagement(kind: InteractionKind, rating: Option<u8>) -> AppResult<Engagement> {
    match kind {
        InteractionKind::Like => Ok(Engagement::Like),
        InteractionKind::Comment => Ok(Engagement::Comment),
        InteractionKind::Share => Ok(Engagement::Share),
        InteractionKind::Rate => {
            let rating = rating.ok_or_else(|| {
                AppError::InvalidInput("Rating is required for type \"rate\"".to_string())
            })?;
            if !(1..=5).contains(&rating) {
                return Err(AppError::InvalidInput(
                    "Rating must be between 1 and 5".to_string(),
                ));
            }
            Ok(Engagement::Rate { rating })
        }
    }
}

impl InteractionService {
    pub fn new(
        users: Arc<dyn UserStore>,
        contents: Arc<dyn ContentStore>,
        interactions: Arc<dyn InteractionStore>,
    ) -> Self {
        Self {
            users,
            contents,
            interactions,
        }
    }

    /// Records a single interaction. Fails with NotFound for an unknown user
    /// or content, InvalidInput for a malformed rating, and Conflict when the
    /// user already has an interaction of this kind on the content.
    pub async fn record(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        kind: InteractionKind,
        rating: Option<u8>,
    ) -> AppResult<Interaction> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.contents
            .find_by_id(content_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

        let engagement = build_engagement(kind, rating)?;

        if self
            .interactions
            .find_one(user_id, content_id, kind)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Interaction of this type already exists for this user and content".to_string(),
            ));
        }

        let interaction = self
            .interactions
            .create(user_id, content_id, engagement)
            .await?;

        tracing::debug!(
            user_id = %user_id,
            content_id = %content_id,
            kind = %kind,
            "Recorded interaction"
        );

        Ok(interaction)
    }

    /// The user's full interaction history with target content joined in
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<InteractionWithContent>> {
        self.interactions.find_by_user(user_id).await
    }

    /// All interactions on a content item; NotFound if the content is unknown
    pub async fn find_by_content(&self, content_id: Uuid) -> AppResult<Vec<Interaction>> {
        self.contents
            .find_by_id(content_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

        self.interactions.find_by_content(content_id).await
    }
}
