//! Core types for Draftcast

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::platforms::Platform;

/// Maximum character count for original and AI-generated content
pub const MAX_CONTENT_CHARS: usize = 1000;

/// A social-media draft or publication owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub owner_id: String,
    pub original_content: String,
    pub ai_generated_content: String,
    pub tone: Option<Tone>,
    pub platforms: Vec<Platform>,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub media: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Post {
    pub fn new(owner_id: String, original_content: String, platforms: Vec<Platform>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            original_content,
            ai_generated_content: String::new(),
            tone: None,
            platforms,
            status: PostStatus::Draft,
            tags: Vec::new(),
            media: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(format!(
                "Invalid status: '{}'. Valid options: draft, published",
                s
            )),
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rewrite style requested from the transformation service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Funny,
    Hype,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Funny => "funny",
            Self::Hype => "hype",
        }
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "professional" => Ok(Self::Professional),
            "funny" => Ok(Self::Funny),
            "hype" => Ok(Self::Hype),
            _ => Err(format!(
                "Invalid tone: '{}'. Valid options: professional, funny, hype",
                s
            )),
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
