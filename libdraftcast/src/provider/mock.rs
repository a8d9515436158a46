//! Mock rewrite provider for testing
//!
//! A configurable provider that can return canned text, fail, or answer with
//! an empty response, while recording every request it receives. Used by
//! integration tests to exercise the transformation pipeline without network
//! access or credentials.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::provider::{CompletionRequest, RewriteProvider};

/// Configuration for mock provider behavior
#[derive(Debug, Clone)]
pub struct MockProviderConfig {
    /// Text returned on success
    pub reply: Option<String>,

    /// Error returned instead of a reply
    pub error: Option<ProviderError>,

    /// Number of times complete has been called
    pub call_count: Arc<Mutex<usize>>,

    /// Requests that have been made (for verification)
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockProviderConfig {
    fn default() -> Self {
        Self {
            reply: Some("Mock rewritten content".to_string()),
            error: None,
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock provider for testing
pub struct MockRewriteProvider {
    config: MockProviderConfig,
}

impl MockRewriteProvider {
    pub fn new(config: MockProviderConfig) -> Self {
        Self { config }
    }

    /// Create a mock that answers every request with the given text
    pub fn reply(text: &str) -> Self {
        Self::new(MockProviderConfig {
            reply: Some(text.to_string()),
            ..Default::default()
        })
    }

    /// Create a mock that fails every request with a transport error
    pub fn failure(message: &str) -> Self {
        Self::new(MockProviderConfig {
            reply: None,
            error: Some(ProviderError::Request(message.to_string())),
            ..Default::default()
        })
    }

    /// Create a mock that fails every request with an API status error
    pub fn api_failure(status: u16, body: &str) -> Self {
        Self::new(MockProviderConfig {
            reply: None,
            error: Some(ProviderError::Api {
                status,
                body: body.to_string(),
            }),
            ..Default::default()
        })
    }

    /// Create a mock whose responses carry no text
    pub fn empty() -> Self {
        Self::new(MockProviderConfig {
            reply: None,
            error: Some(ProviderError::EmptyResponse),
            ..Default::default()
        })
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.config.call_count.lock().unwrap()
    }

    /// Get all requests that were made
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.config.requests.lock().unwrap().clone()
    }

    /// Handles to the shared counters, for asserting after the provider has
    /// been moved into an `Arc<dyn RewriteProvider>`
    pub fn observer(&self) -> MockProviderConfig {
        self.config.clone()
    }
}

#[async_trait]
impl RewriteProvider for MockRewriteProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        *self.config.call_count.lock().unwrap() += 1;
        self.config.requests.lock().unwrap().push(request);

        if let Some(error) = &self.config.error {
            return Err(error.clone());
        }

        match &self.config.reply {
            Some(text) => Ok(text.clone()),
            None => Err(ProviderError::EmptyResponse),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
