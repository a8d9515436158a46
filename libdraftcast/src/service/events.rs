//! Event system for observability
//!
//! An in-process event bus distributing structured events from the
//! transformation and lifecycle paths to subscribers without blocking the
//! emitting operation. This replaces ad-hoc console logging on the rewrite
//! path: subscribers decide what to do with the events (UI updates, metrics,
//! structured logs).
//!
//! Built on `tokio::sync::broadcast`: if no subscribers exist events are
//! dropped immediately, and lagging subscribers miss oldest events first.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Event bus for distributing progress events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the specified per-subscriber capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events
    ///
    /// Returns a receiver that will receive all events emitted after
    /// subscription. Multiple subscribers are supported.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Non-blocking; the send result is ignored because an empty subscriber
    /// list is not an error.
    pub fn emit(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Events emitted by services during operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A rewrite was requested
    RewriteStarted {
        tone: String,
        platform: String,
    },

    /// A rewrite finished, either from the provider or the local fallback
    RewriteCompleted {
        platform: String,
        character_count: usize,
        used_fallback: bool,
    },

    /// A suggestion analysis was requested
    SuggestStarted,

    /// The suggestion provider call failed (no fallback exists)
    SuggestFailed {
        error: String,
    },

    /// A post was created
    PostCreated {
        post_id: String,
        status: String,
    },

    /// A post was updated
    PostUpdated {
        post_id: String,
    },

    /// A post was deleted
    PostDeleted {
        post_id: String,
    },
}
