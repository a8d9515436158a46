//! Content transformation service
//!
//! Rewrites raw post content in a requested tone through the injected
//! rewrite provider, with a deterministic local fallback and platform-aware
//! normalization of whatever text comes back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::events::{Event, EventBus};
use crate::error::{DraftcastError, Result};
use crate::platforms::character_limit_for;
use crate::provider::{CompletionRequest, RewriteProvider};
use crate::types::Tone;

const REWRITE_PERSONA: &str = "You are an expert social media copywriter.";
const REWRITE_TEMPERATURE: f32 = 0.75;
const REWRITE_MAX_TOKENS: u32 = 180;

const SUGGEST_PERSONA: &str = "You are a social media strategist.";
const SUGGEST_TEMPERATURE: f32 = 0.6;
const SUGGEST_MAX_TOKENS: u32 = 200;

/// Transformation service
///
/// Stateless between calls; holds only the provider capability and the
/// event bus. One provider attempt per operation, no retry loop.
#[derive(Clone)]
pub struct TransformService {
    provider: Arc<dyn RewriteProvider>,
    event_bus: EventBus,
}

/// Request to rewrite content for a platform
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub content: String,
    pub tone: String,
    pub platform: String,
}

/// A finished rewrite with its platform budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub original_content: String,
    pub generated_content: String,
    pub tone: Tone,
    pub platform: String,
    pub character_count: usize,
    pub character_limit: usize,
}

/// Raw suggestion text for a piece of content
///
/// `suggestions` is returned exactly as the provider produced it; it is not
/// guaranteed to be valid structured data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub content: String,
    pub suggestions: String,
}

impl TransformService {
    pub fn new(provider: Arc<dyn RewriteProvider>, event_bus: EventBus) -> Self {
        Self {
            provider,
            event_bus,
        }
    }

    /// Rewrite content in the requested tone for a target platform
    ///
    /// Provider failures never surface here: any transport error, API error,
    /// or empty response is masked by the deterministic tone-keyed fallback,
    /// so the caller always receives usable text within the platform budget.
    ///
    /// # Errors
    ///
    /// Returns `DraftcastError::Validation` for empty content or an
    /// unrecognized tone.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GeneratedContent> {
        if request.content.trim().is_empty() {
            return Err(DraftcastError::Validation(
                "Content and tone are required".to_string(),
            ));
        }
        let tone: Tone = request
            .tone
            .parse()
            .map_err(DraftcastError::Validation)?;

        let character_limit = character_limit_for(&request.platform);

        self.event_bus.emit(Event::RewriteStarted {
            tone: tone.to_string(),
            platform: request.platform.clone(),
        });

        let prompt = build_rewrite_prompt(&request.content, tone, &request.platform, character_limit);
        let completion = self
            .provider
            .complete(CompletionRequest {
                system: REWRITE_PERSONA.to_string(),
                user: prompt,
                temperature: REWRITE_TEMPERATURE,
                max_tokens: REWRITE_MAX_TOKENS,
            })
            .await;

        let (raw, used_fallback) = match completion {
            Ok(text) if !text.trim().is_empty() => (text, false),
            Ok(_) => {
                warn!(provider = self.provider.name(), "Provider returned empty text, using fallback");
                (fallback_content(tone, &request.content), true)
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Provider call failed, using fallback");
                (fallback_content(tone, &request.content), true)
            }
        };

        let generated_content = enforce_limit(strip_wrapping_quotes(&raw), character_limit);
        let character_count = generated_content.chars().count();
        debug!(character_count, character_limit, used_fallback, "Rewrite finished");

        self.event_bus.emit(Event::RewriteCompleted {
            platform: request.platform.clone(),
            character_count,
            used_fallback,
        });

        Ok(GeneratedContent {
            original_content: request.content,
            generated_content,
            tone,
            platform: request.platform,
            character_count,
            character_limit,
        })
    }

    /// Ask the provider for improvement suggestions, hashtags, and
    /// engagement tips
    ///
    /// Unlike [`generate`](Self::generate) there is no fallback: the
    /// suggestions are advisory, and synthesizing them locally would be
    /// misinformation. The provider text is returned unparsed.
    ///
    /// # Errors
    ///
    /// Returns `DraftcastError::Validation` for empty content and
    /// `DraftcastError::Transformation` when the provider call fails.
    pub async fn suggest(&self, content: &str) -> Result<Suggestion> {
        if content.trim().is_empty() {
            return Err(DraftcastError::Validation(
                "Content is required".to_string(),
            ));
        }

        self.event_bus.emit(Event::SuggestStarted);

        let suggestions = self
            .provider
            .complete(CompletionRequest {
                system: SUGGEST_PERSONA.to_string(),
                user: build_suggest_prompt(content),
                temperature: SUGGEST_TEMPERATURE,
                max_tokens: SUGGEST_MAX_TOKENS,
            })
            .await
            .map_err(|e| {
                warn!(provider = self.provider.name(), error = %e, "Suggestion call failed");
                self.event_bus.emit(Event::SuggestFailed {
                    error: e.to_string(),
                });
                DraftcastError::Transformation("Suggestion generation failed".to_string())
            })?;

        Ok(Suggestion {
            content: content.to_string(),
            suggestions,
        })
    }
}

fn build_rewrite_prompt(content: &str, tone: Tone, platform: &str, limit: usize) -> String {
    format!(
        "Rewrite the content below in a {tone} tone for {platform}.\n\
         \n\
         Guidelines:\n\
         - Keep the original meaning\n\
         - Rewrite fully (do NOT copy sentences)\n\
         - Match the tone strongly\n\
         - Make it natural and human-like\n\
         - Stay under {limit} characters\n\
         - Return ONLY the rewritten content\n\
         \n\
         Content:\n\
         \"{content}\"",
    )
}

fn build_suggest_prompt(content: &str) -> String {
    format!(
        "Analyze the content and suggest improvements.\n\
         Return STRICT JSON with:\n\
         - improvements (array)\n\
         - hashtags (array)\n\
         - engagement_tips (array)\n\
         \n\
         Content:\n\
         \"{content}\"",
    )
}

/// Deterministic substitute text used when the provider is unavailable
fn fallback_content(tone: Tone, content: &str) -> String {
    match tone {
        Tone::Professional => format!(
            "We are pleased to share that {content}, reflecting our commitment to delivering meaningful value and impactful outcomes."
        ),
        Tone::Funny => format!(
            "Well well well… {content} 😄 Guess today just got more interesting!"
        ),
        Tone::Hype => format!(
            "🔥 BIG NEWS! {content} 🔥 This is just the beginning — stay tuned!"
        ),
    }
}

/// Strip one matching quote character from both ends, if present
fn strip_wrapping_quotes(text: &str) -> &str {
    let mut chars = text.chars();
    if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
        if first == last && (first == '"' || first == '\'') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Clamp text to the platform budget, ellipsizing on overflow
///
/// Counts characters, not bytes. When truncation happens the result is
/// exactly `limit` characters long and ends with `...`; budgets below the
/// ellipsis floor degrade to a truncated ellipsis.
fn enforce_limit(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit < 3 {
        return "...".chars().take(limit).collect();
    }
    let truncated: String = text.chars().take(limit - 3).collect();
    format!("{truncated}...")
}
