//! Post lifecycle and aggregation service
//!
//! Owner-scoped CRUD over persisted posts plus per-status and per-platform
//! statistics. Every operation takes the caller-supplied owner identity;
//! posts belonging to other owners are indistinguishable from absent ones.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::{Event, EventBus};
use crate::db::Database;
use crate::error::{DraftcastError, Result};
use crate::platforms::Platform;
use crate::types::{Post, PostStatus, Tone, MAX_CONTENT_CHARS};

/// Post lifecycle service
#[derive(Clone)]
pub struct PostService {
    db: Arc<Database>,
    event_bus: EventBus,
}

/// Fields accepted when creating a post
///
/// Omitted optional fields take the documented defaults: empty AI content,
/// no tone, no tags, no media, draft status.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub original_content: String,
    pub ai_generated_content: Option<String>,
    pub tone: Option<String>,
    pub platforms: Vec<String>,
    pub tags: Option<Vec<String>>,
    pub media: Option<String>,
    pub status: Option<String>,
}

/// Partial update: a present field overwrites the stored value (even when
/// empty), an absent field is left untouched. `tone` uses a nested Option so
/// `Some(None)` clears the stored tone.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub original_content: Option<String>,
    pub ai_generated_content: Option<String>,
    pub tone: Option<Option<String>>,
    pub platforms: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub media: Option<String>,
    pub status: Option<String>,
}

/// Pagination and filtering for [`PostService::list`]
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,
    /// Posts per page
    pub limit: u32,
    /// Exact status filter
    pub status: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            status: None,
        }
    }
}

/// One page of an owner's posts, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

/// Aggregated statistics over an owner's posts
///
/// Breakdowns only carry keys actually present; no zero-count rows are
/// synthesized for unused statuses or platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostStats {
    pub total_posts: u64,
    pub status_breakdown: BTreeMap<String, u64>,
    pub platform_breakdown: BTreeMap<String, u64>,
}

impl PostService {
    pub fn new(db: Arc<Database>, event_bus: EventBus) -> Self {
        Self { db, event_bus }
    }

    /// Create a post for the given owner
    ///
    /// # Errors
    ///
    /// Returns `DraftcastError::Validation` when the content is empty or too
    /// long, the platform set is empty or carries unknown identifiers, or
    /// tone/status do not parse.
    pub async fn create(&self, owner_id: &str, fields: NewPost) -> Result<Post> {
        validate_content(&fields.original_content)?;
        let platforms = parse_platforms(&fields.platforms)?;

        let ai_generated_content = fields.ai_generated_content.unwrap_or_default();
        validate_ai_content(&ai_generated_content)?;

        let mut post = Post::new(
            owner_id.to_string(),
            fields.original_content,
            platforms,
        );
        post.ai_generated_content = ai_generated_content;
        post.tone = parse_tone(fields.tone.as_deref())?;
        post.tags = trim_tags(fields.tags.unwrap_or_default());
        post.media = fields.media.unwrap_or_default();
        post.status = match fields.status.as_deref() {
            Some(s) => parse_status(s)?,
            None => PostStatus::Draft,
        };

        self.db.create_post(&post).await?;
        debug!(post_id = %post.id, status = %post.status, "Post created");

        self.event_bus.emit(Event::PostCreated {
            post_id: post.id.clone(),
            status: post.status.to_string(),
        });

        Ok(post)
    }

    /// Get one of the owner's posts by ID
    ///
    /// # Errors
    ///
    /// Returns `DraftcastError::NotFound` when no such post exists for this
    /// owner.
    pub async fn get(&self, owner_id: &str, post_id: &str) -> Result<Post> {
        self.db
            .get_post(owner_id, post_id)
            .await?
            .ok_or_else(|| DraftcastError::NotFound("Post not found".to_string()))
    }

    /// List the owner's posts, newest first, with pagination and an optional
    /// exact status filter
    pub async fn list(&self, owner_id: &str, query: ListQuery) -> Result<PostPage> {
        let status = query
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?;

        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let offset = i64::from(page - 1) * i64::from(limit);

        let posts = self
            .db
            .list_posts(owner_id, status, i64::from(limit), offset)
            .await?;
        let total = self.db.count_posts(owner_id, status).await? as u64;
        let total_pages = total.div_ceil(u64::from(limit));

        Ok(PostPage {
            posts,
            total,
            total_pages,
            current_page: page,
        })
    }

    /// Apply a partial update to one of the owner's posts
    ///
    /// Always refreshes `updated_at`, including for no-op updates.
    ///
    /// # Errors
    ///
    /// Returns `DraftcastError::NotFound` when the post does not exist for
    /// this owner, `DraftcastError::Validation` when a supplied field fails
    /// validation.
    pub async fn update(&self, owner_id: &str, post_id: &str, update: PostUpdate) -> Result<Post> {
        let mut post = self.get(owner_id, post_id).await?;

        if let Some(content) = update.original_content {
            validate_content(&content)?;
            post.original_content = content;
        }
        if let Some(ai_content) = update.ai_generated_content {
            validate_ai_content(&ai_content)?;
            post.ai_generated_content = ai_content;
        }
        if let Some(tone) = update.tone {
            post.tone = parse_tone(tone.as_deref())?;
        }
        if let Some(platforms) = update.platforms {
            post.platforms = parse_platforms(&platforms)?;
        }
        if let Some(tags) = update.tags {
            post.tags = trim_tags(tags);
        }
        if let Some(media) = update.media {
            post.media = media;
        }
        if let Some(status) = update.status {
            post.status = parse_status(&status)?;
        }
        post.updated_at = chrono::Utc::now().timestamp();

        // The row can vanish between the read and the write; treat that the
        // same as never having existed
        if !self.db.update_post(&post).await? {
            return Err(DraftcastError::NotFound("Post not found".to_string()));
        }
        debug!(post_id = %post.id, "Post updated");

        self.event_bus.emit(Event::PostUpdated {
            post_id: post.id.clone(),
        });

        Ok(post)
    }

    /// Permanently delete one of the owner's posts
    ///
    /// # Errors
    ///
    /// Returns `DraftcastError::NotFound` when the post does not exist for
    /// this owner.
    pub async fn delete(&self, owner_id: &str, post_id: &str) -> Result<()> {
        if !self.db.delete_post(owner_id, post_id).await? {
            return Err(DraftcastError::NotFound("Post not found".to_string()));
        }
        debug!(post_id, "Post deleted");

        self.event_bus.emit(Event::PostDeleted {
            post_id: post_id.to_string(),
        });

        Ok(())
    }

    /// Aggregate statistics over the owner's posts
    pub async fn stats(&self, owner_id: &str) -> Result<PostStats> {
        let total_posts = self.db.count_posts(owner_id, None).await? as u64;

        let status_breakdown = self
            .db
            .status_counts(owner_id)
            .await?
            .into_iter()
            .map(|(status, n)| (status, n as u64))
            .collect();

        let platform_breakdown = self
            .db
            .platform_counts(owner_id)
            .await?
            .into_iter()
            .map(|(platform, n)| (platform, n as u64))
            .collect();

        Ok(PostStats {
            total_posts,
            status_breakdown,
            platform_breakdown,
        })
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(DraftcastError::Validation(
            "Original content and at least one platform are required".to_string(),
        ));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(DraftcastError::Validation(format!(
            "Content cannot exceed {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

fn validate_ai_content(content: &str) -> Result<()> {
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(DraftcastError::Validation(format!(
            "AI content cannot exceed {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

/// Parse and deduplicate platform identifiers, keeping first-occurrence order
fn parse_platforms(platforms: &[String]) -> Result<Vec<Platform>> {
    if platforms.is_empty() {
        return Err(DraftcastError::Validation(
            "Original content and at least one platform are required".to_string(),
        ));
    }

    let mut parsed: Vec<Platform> = Vec::with_capacity(platforms.len());
    for identifier in platforms {
        let platform = identifier
            .parse::<Platform>()
            .map_err(DraftcastError::Validation)?;
        if !parsed.contains(&platform) {
            parsed.push(platform);
        }
    }
    Ok(parsed)
}

fn parse_tone(tone: Option<&str>) -> Result<Option<Tone>> {
    tone.map(|s| s.parse::<Tone>().map_err(DraftcastError::Validation))
        .transpose()
}

fn parse_status(status: &str) -> Result<PostStatus> {
    status
        .parse::<PostStatus>()
        .map_err(DraftcastError::Validation)
}

fn trim_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().map(|t| t.trim().to_string()).collect()
}
