//! Database operations for Draftcast

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::Path;

use crate::error::{DbError, Result};
use crate::types::{Post, PostStatus};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(db_path: &str) -> Result<Self> {
        // Expand path and create parent directories
        let expanded_path = shellexpand::tilde(db_path).to_string();
        let path = Path::new(&expanded_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DbError::IoError)?;
        }

        // Forward slashes work on both Windows and Unix in SQLite URLs;
        // mode=rwc creates the database file if it doesn't exist
        let db_url = format!("sqlite://{}?mode=rwc", expanded_path.replace('\\', "/"));

        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(DbError::SqlxError)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DbError::MigrationError)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database, for tests
    ///
    /// Pinned to a single connection: every pooled connection to
    /// `sqlite::memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(DbError::SqlxError)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DbError::MigrationError)?;

        Ok(Self { pool })
    }

    /// Insert a new post
    pub async fn create_post(&self, post: &Post) -> Result<()> {
        let platforms = serde_json::to_string(&post.platforms).map_err(DbError::DecodeError)?;
        let tags = serde_json::to_string(&post.tags).map_err(DbError::DecodeError)?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, owner_id, original_content, ai_generated_content,
                               tone, platforms, status, tags, media, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.owner_id)
        .bind(&post.original_content)
        .bind(&post.ai_generated_content)
        .bind(post.tone.map(|t| t.as_str()))
        .bind(platforms)
        .bind(post.status.as_str())
        .bind(tags)
        .bind(&post.media)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(())
    }

    /// Get a post by ID, scoped to its owner
    ///
    /// Returns `None` when no such post exists for that owner; posts owned
    /// by other users are indistinguishable from absent ones.
    pub async fn get_post(&self, owner_id: &str, post_id: &str) -> Result<Option<Post>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, original_content, ai_generated_content,
                   tone, platforms, status, tags, media, created_at, updated_at
            FROM posts WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        row.map(post_from_row).transpose()
    }

    /// List an owner's posts, newest first, optionally filtered by status
    pub async fn list_posts(
        &self,
        owner_id: &str,
        status: Option<PostStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>> {
        // rowid tiebreak keeps same-second creations most-recent-first
        let mut sql = String::from(
            r#"
            SELECT id, owner_id, original_content, ai_generated_content,
                   tone, platforms, status, tags, media, created_at, updated_at
            FROM posts WHERE owner_id = ?
            "#,
        );
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql).bind(owner_id);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }
        query = query.bind(limit).bind(offset);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::SqlxError)?;

        rows.into_iter().map(post_from_row).collect()
    }

    /// Count an owner's posts, optionally filtered by status
    pub async fn count_posts(&self, owner_id: &str, status: Option<PostStatus>) -> Result<i64> {
        let mut sql = String::from("SELECT COUNT(*) AS n FROM posts WHERE owner_id = ?");
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }

        let mut query = sqlx::query(&sql).bind(owner_id);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::SqlxError)?;

        Ok(row.get("n"))
    }

    /// Write back a full post row, scoped to its owner
    ///
    /// Returns `false` when no matching row exists.
    pub async fn update_post(&self, post: &Post) -> Result<bool> {
        let platforms = serde_json::to_string(&post.platforms).map_err(DbError::DecodeError)?;
        let tags = serde_json::to_string(&post.tags).map_err(DbError::DecodeError)?;

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET original_content = ?, ai_generated_content = ?, tone = ?,
                platforms = ?, status = ?, tags = ?, media = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&post.original_content)
        .bind(&post.ai_generated_content)
        .bind(post.tone.map(|t| t.as_str()))
        .bind(platforms)
        .bind(post.status.as_str())
        .bind(tags)
        .bind(&post.media)
        .bind(post.updated_at)
        .bind(&post.id)
        .bind(&post.owner_id)
        .execute(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a post, scoped to its owner
    ///
    /// Returns `false` when no matching row exists.
    pub async fn delete_post(&self, owner_id: &str, post_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ? AND owner_id = ?")
            .bind(post_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(DbError::SqlxError)?;

        Ok(result.rows_affected() > 0)
    }

    /// Count an owner's posts grouped by status
    ///
    /// Only statuses actually present appear in the result.
    pub async fn status_counts(&self, owner_id: &str) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT status, COUNT(*) AS n
            FROM posts WHERE owner_id = ?
            GROUP BY status
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(rows
            .iter()
            .map(|r| (r.get("status"), r.get("n")))
            .collect())
    }

    /// Count an owner's posts grouped by platform
    ///
    /// A post contributes once per platform it lists (JSON array unnest).
    pub async fn platform_counts(&self, owner_id: &str) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT je.value AS platform, COUNT(*) AS n
            FROM posts, json_each(posts.platforms) AS je
            WHERE posts.owner_id = ?
            GROUP BY je.value
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(rows
            .iter()
            .map(|r| (r.get("platform"), r.get("n")))
            .collect())
    }
}

fn post_from_row(row: SqliteRow) -> Result<Post> {
    let platforms: String = row.get("platforms");
    let tags: String = row.get("tags");

    Ok(Post {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        original_content: row.get("original_content"),
        ai_generated_content: row.get("ai_generated_content"),
        tone: row
            .get::<Option<String>, _>("tone")
            .and_then(|s| s.parse().ok()),
        platforms: serde_json::from_str(&platforms).map_err(DbError::DecodeError)?,
        status: match row.get::<String, _>("status").as_str() {
            "published" => PostStatus::Published,
            _ => PostStatus::Draft,
        },
        tags: serde_json::from_str(&tags).map_err(DbError::DecodeError)?,
        media: row.get("media"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
