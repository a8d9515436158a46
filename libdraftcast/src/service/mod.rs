//! Service layer for Draftcast
//!
//! A clean, testable API for the core logic, consumable by any interface
//! (CLI, HTTP handler, TUI) without duplication.
//!
//! # Architecture
//!
//! `DraftcastService` is a facade coordinating specialized sub-services:
//!
//! - `TransformService`: tone rewrites with fallback, and suggestions
//! - `PostService`: owner-scoped post lifecycle and statistics
//! - `EventBus`: structured event distribution
//!
//! # Example
//!
//! ```no_run
//! use libdraftcast::service::DraftcastService;
//! use libdraftcast::service::transform::GenerateRequest;
//!
//! # async fn example() -> libdraftcast::Result<()> {
//! let service = DraftcastService::new().await?;
//!
//! let rewritten = service
//!     .transform()
//!     .generate(GenerateRequest {
//!         content: "we shipped v2 today".to_string(),
//!         tone: "hype".to_string(),
//!         platform: "twitter".to_string(),
//!     })
//!     .await?;
//! println!("{}", rewritten.generated_content);
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod posts;
pub mod transform;

pub use events::{Event, EventBus, EventReceiver};

use std::sync::Arc;

use self::posts::PostService;
use self::transform::TransformService;
use crate::provider::{HttpRewriteProvider, RewriteProvider};
use crate::{Config, Database, DraftcastError, Result};

/// Main service facade that coordinates all sub-services
///
/// Sub-services share the same `Arc<Database>` and event bus; the rewrite
/// provider is injected so tests can substitute a deterministic one.
pub struct DraftcastService {
    db: Arc<Database>,
    transform: TransformService,
    posts: PostService,
    event_bus: EventBus,
}

impl DraftcastService {
    /// Create a service with configuration from the default location
    ///
    /// Builds an [`HttpRewriteProvider`] from the `[rewrite]` section. A
    /// missing or keyless section is not an error: provider calls will fail
    /// and `generate` masks that with its fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, the database
    /// cannot be initialized, or migrations fail.
    pub async fn new() -> Result<Self> {
        let config = Config::load()?;
        let provider = HttpRewriteProvider::from_config(&config.rewrite)
            .map_err(|e| DraftcastError::Transformation(e.to_string()))?;
        Self::from_config(config, Arc::new(provider)).await
    }

    /// Create a service with custom configuration and an injected provider
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized or migrations
    /// fail.
    pub async fn from_config(
        config: Config,
        provider: Arc<dyn RewriteProvider>,
    ) -> Result<Self> {
        let db = Arc::new(Database::new(&config.database.path).await?);
        let event_bus = EventBus::new(100);

        let transform = TransformService::new(provider, event_bus.clone());
        let posts = PostService::new(Arc::clone(&db), event_bus.clone());

        Ok(Self {
            db,
            transform,
            posts,
            event_bus,
        })
    }

    /// Access the database directly
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Access the transformation service
    pub fn transform(&self) -> &TransformService {
        &self.transform
    }

    /// Access the post lifecycle service
    pub fn posts(&self) -> &PostService {
        &self.posts
    }

    /// Subscribe to service events
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }
}
