//! End-to-end post lifecycle tests against a file-backed database

use std::sync::Arc;

use libdraftcast::db::Database;
use libdraftcast::service::events::EventBus;
use libdraftcast::service::posts::{ListQuery, NewPost, PostService, PostUpdate};
use libdraftcast::{DraftcastError, PostStatus};
use tempfile::TempDir;

async fn setup_service() -> (PostService, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("lifecycle.db");
    let db = Database::new(db_path.to_str().unwrap()).await.unwrap();

    (
        PostService::new(Arc::new(db), EventBus::new(100)),
        temp_dir,
    )
}

fn new_post(content: &str, platforms: &[&str]) -> NewPost {
    NewPost {
        original_content: content.to_string(),
        platforms: platforms.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_draft_publish_delete_cycle() {
    let (service, _temp_dir) = setup_service().await;

    // Created without a status, a post is a draft
    let post = service
        .create("alice", new_post("Cycle content", &["twitter"]))
        .await
        .unwrap();
    let fetched = service.get("alice", &post.id).await.unwrap();
    assert_eq!(fetched.status, PostStatus::Draft);

    // Publish
    service
        .update(
            "alice",
            &post.id,
            PostUpdate {
                status: Some("published".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let fetched = service.get("alice", &post.id).await.unwrap();
    assert_eq!(fetched.status, PostStatus::Published);

    // Delete, then every access reports not-found
    service.delete("alice", &post.id).await.unwrap();
    let err = service.get("alice", &post.id).await.unwrap_err();
    assert!(matches!(err, DraftcastError::NotFound(_)));
}

#[tokio::test]
async fn test_pagination_fifteen_posts() {
    let (service, _temp_dir) = setup_service().await;

    for i in 0..15 {
        service
            .create("alice", new_post(&format!("Post {}", i), &["twitter"]))
            .await
            .unwrap();
    }

    let page = service
        .list(
            "alice",
            ListQuery {
                page: 2,
                limit: 10,
                status: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(page.posts.len(), 5);
    assert_eq!(page.total, 15);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.current_page, 2);
}

#[tokio::test]
async fn test_platform_breakdown_counts_each_listing() {
    let (service, _temp_dir) = setup_service().await;

    service
        .create("alice", new_post("First", &["twitter"]))
        .await
        .unwrap();
    service
        .create("alice", new_post("Second", &["twitter", "linkedin"]))
        .await
        .unwrap();

    let stats = service.stats("alice").await.unwrap();
    assert_eq!(stats.total_posts, 2);
    assert_eq!(stats.platform_breakdown.get("twitter"), Some(&2));
    assert_eq!(stats.platform_breakdown.get("linkedin"), Some(&1));
    assert!(!stats.platform_breakdown.contains_key("instagram"));
}

#[tokio::test]
async fn test_cross_owner_access_is_not_found() {
    let (service, _temp_dir) = setup_service().await;

    let post = service
        .create("alice", new_post("Mine", &["twitter"]))
        .await
        .unwrap();

    for result in [
        service.get("bob", &post.id).await.map(|_| ()),
        service
            .update("bob", &post.id, PostUpdate::default())
            .await
            .map(|_| ()),
        service.delete("bob", &post.id).await,
    ] {
        match result {
            Err(DraftcastError::NotFound(_)) => {}
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_updated_at_refreshes_on_every_update() {
    let (service, _temp_dir) = setup_service().await;

    let post = service
        .create("alice", new_post("Original", &["twitter"]))
        .await
        .unwrap();

    let updated = service
        .update(
            "alice",
            &post.id,
            PostUpdate {
                original_content: Some("Edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.created_at, post.created_at);
    assert!(updated.updated_at >= post.updated_at);
    assert_eq!(updated.original_content, "Edited");
}
