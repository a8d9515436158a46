//! HTTP rewrite provider for OpenAI-compatible chat completion endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RewriteConfig;
use crate::error::ProviderError;
use crate::provider::{CompletionRequest, RewriteProvider};

/// Rewrite provider backed by an OpenAI-compatible `/chat/completions`
/// endpoint.
///
/// The API key is taken from [`RewriteConfig`] at construction time; an empty
/// key is accepted and simply produces authentication failures at call time,
/// which callers handle like any other provider fault.
pub struct HttpRewriteProvider {
    client: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
}

impl HttpRewriteProvider {
    /// Create a provider from the `[rewrite]` configuration section
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Request`] if the HTTP client cannot be built.
    pub fn from_config(config: &RewriteConfig) -> Result<Self, ProviderError> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl RewriteProvider for HttpRewriteProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, url = %url, "Calling rewrite provider");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Request(format!("Failed to parse response: {}", e)))?;

        let text = result
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let config = RewriteConfig {
            api_key: "key".to_string(),
            base_url: "https://api.groq.com/openai/v1/".to_string(),
            ..Default::default()
        };

        let provider = HttpRewriteProvider::from_config(&config).unwrap();
        assert_eq!(provider.base_url, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn test_from_config_accepts_empty_api_key() {
        // Missing credentials become an authentication failure at call time,
        // never a construction failure
        let config = RewriteConfig::default();
        let provider = HttpRewriteProvider::from_config(&config).unwrap();
        assert_eq!(provider.api_key, "");
        assert_eq!(provider.name(), "groq");
    }

    #[test]
    fn test_response_parsing_shape() {
        let json = r#"{"choices":[{"message":{"content":"  Rewritten text.  "}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        let text = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();
        assert_eq!(text, "Rewritten text.");
    }

    #[test]
    fn test_response_parsing_missing_content() {
        let json = r#"{"choices":[{"message":{}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
