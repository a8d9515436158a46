//! Rewrite provider abstraction and implementations
//!
//! The external language-model service is reached through the
//! [`RewriteProvider`] trait so callers can substitute a deterministic
//! implementation in tests instead of a live endpoint.

use async_trait::async_trait;

use crate::error::ProviderError;

pub mod http;

// Mock provider is available for all builds (not just tests) to support
// integration tests
pub mod mock;

pub use http::HttpRewriteProvider;
pub use mock::MockRewriteProvider;

/// One chat-style completion request: a persona-setting system message and a
/// user instruction, with sampling knobs.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System message establishing the assistant's persona
    pub system: String,
    /// User instruction containing the built prompt
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Response length cap in tokens
    pub max_tokens: u32,
}

/// Capability for generating text from a prompt exchange
///
/// Implementations make at most one attempt per call; retry policy belongs
/// to the caller.
#[async_trait]
pub trait RewriteProvider: Send + Sync {
    /// Generate a completion for the given request
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the request cannot be sent, the service
    /// answers with a non-success status, or the response carries no text.
    async fn complete(&self, request: CompletionRequest)
        -> Result<String, ProviderError>;

    /// Lowercase identifier for the provider (e.g. "groq", "mock")
    fn name(&self) -> &str;
}
