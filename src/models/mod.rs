use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// A registered user with their declared tag preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub preferences: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub preferences: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Video,
    Podcast,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Video => "video",
            ContentType::Podcast => "podcast",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(ContentType::Article),
            "video" => Ok(ContentType::Video),
            "podcast" => Ok(ContentType::Podcast),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// A content item eligible for recommendation
///
/// `popularity` is a derived cache of engagement, recomputable at any time
/// from the item's interaction history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub tags: Vec<String>,
    pub popularity: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a content item
#[derive(Debug, Clone)]
pub struct NewContent {
    pub title: String,
    pub content_type: ContentType,
    pub tags: Vec<String>,
}

/// Payload-free discriminant of an interaction, used for lookups and wire values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Like,
    Comment,
    Share,
    Rate,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Like => "like",
            InteractionKind::Comment => "comment",
            InteractionKind::Share => "share",
            InteractionKind::Rate => "rate",
        }
    }
}

impl Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(InteractionKind::Like),
            "comment" => Ok(InteractionKind::Comment),
            "share" => Ok(InteractionKind::Share),
            "rate" => Ok(InteractionKind::Rate),
            other => Err(format!("unknown interaction kind: {}", other)),
        }
    }
}

/// What the user actually did. A rating exists only on `Rate`, so a rated
/// interaction without a rating is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engagement {
    Like,
    Comment,
    Share,
    Rate { rating: u8 },
}

impl Engagement {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Engagement::Like => InteractionKind::Like,
            Engagement::Comment => InteractionKind::Comment,
            Engagement::Share => InteractionKind::Share,
            Engagement::Rate { .. } => InteractionKind::Rate,
        }
    }

    pub fn rating(&self) -> Option<u8> {
        match self {
            Engagement::Rate { rating } => Some(*rating),
            _ => None,
        }
    }
}

/// A single, immutable interaction event between a user and a content item
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub engagement: Engagement,
    pub created_at: DateTime<Utc>,
}

/// An interaction with its target content resolved in, replacing the
/// source system's lazily loaded relation
#[derive(Debug, Clone)]
pub struct InteractionWithContent {
    pub interaction: Interaction,
    pub content: Content,
}
