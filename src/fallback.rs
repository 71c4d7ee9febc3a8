//! Fallback responder abstraction and implementations.
//!
//! When no knowledge-base entry clears the acceptance threshold, the agent
//! consults a [`FallbackResponder`]:
//!
//! - **[`OpenAiResponder`]** — calls the OpenAI chat completions API with
//!   retry and backoff. Selected when `fallback.provider = "openai"` and the
//!   `OPENAI_API_KEY` environment variable is set.
//! - **[`DisabledResponder`]** — always returns an error; selected when the
//!   provider is `"disabled"` or no credential is present.
//!
//! Every error from this module stops at the agent boundary: the caller of
//! [`crate::agent::SupportAgent::answer`] only ever sees either a generated
//! reply or [`GENERIC_REPLY`].
//!
//! # Retry strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::FallbackConfig;

/// Returned by the agent whenever the responder fails or is disabled.
pub const GENERIC_REPLY: &str = "I don't have a predefined Thoughtful AI answer for that yet, \
     but I can still help. Could you share a little more detail so I can provide a useful next step?";

/// Returned when the model answers with empty content.
const EMPTY_CONTENT_REPLY: &str = "I'm here to help.";

const SYSTEM_PROMPT: &str =
    "You are a concise, friendly customer support assistant for general questions.";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// A collaborator that can produce a free-text reply to an unmatched question.
#[async_trait]
pub trait FallbackResponder: Send + Sync {
    /// Returns the responder identifier (e.g. `"openai"`, `"disabled"`).
    fn name(&self) -> &str;

    /// Generate a reply to the user's question.
    async fn reply(&self, question: &str) -> Result<String>;
}

// ============ Disabled Responder ============

/// A no-op responder that always returns an error.
///
/// Used when no API credential is available, which keeps the agent fully
/// functional offline: the error is downgraded to [`GENERIC_REPLY`] upstream.
pub struct DisabledResponder;

#[async_trait]
impl FallbackResponder for DisabledResponder {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn reply(&self, _question: &str) -> Result<String> {
        bail!("Fallback responder is disabled")
    }
}

// ============ OpenAI Responder ============

/// Responder backed by the OpenAI chat completions API.
///
/// Model resolution order: `fallback.model` config value, then the
/// `OPENAI_MODEL` environment variable, then `gpt-4o-mini`.
pub struct OpenAiResponder {
    model: String,
    api_key: String,
    timeout_secs: u64,
    max_retries: u32,
}

impl OpenAiResponder {
    /// Create a new OpenAI responder from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not in the environment.
    pub fn new(config: &FallbackConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let model = config
            .model
            .clone()
            .or_else(|| std::env::var("OPENAI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            model,
            api_key,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl FallbackResponder for OpenAiResponder {
    fn name(&self) -> &str {
        "openai"
    }

    async fn reply(&self, question: &str) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;

        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0.2,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": question },
            ],
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            tracing::debug!(model = %self.model, attempt, "requesting fallback completion");

            let resp = client
                .post(CHAT_COMPLETIONS_URL)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_chat_reply(&json);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!(
                            "OpenAI API error {}: {}",
                            status,
                            body_text
                        ));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("OpenAI API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Fallback request failed after retries")))
    }
}

/// Extract the assistant message from a chat completions response.
///
/// Missing or empty content degrades to a fixed greeting rather than an
/// error; a response without choices is malformed and fails.
fn parse_chat_reply(json: &serde_json::Value) -> Result<String> {
    let choice = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing choices"))?;

    let content = choice
        .pointer("/message/content")
        .and_then(|c| c.as_str())
        .unwrap_or("");

    if content.is_empty() {
        return Ok(EMPTY_CONTENT_REPLY.to_string());
    }

    Ok(content.to_string())
}

/// Create the appropriate [`FallbackResponder`] based on configuration.
///
/// The `"openai"` provider silently degrades to [`DisabledResponder`] when
/// `OPENAI_API_KEY` is absent: a missing credential disables the external
/// path, it is not an error.
pub fn create_responder(config: &FallbackConfig) -> Result<Box<dyn FallbackResponder>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledResponder)),
        "openai" => {
            if std::env::var("OPENAI_API_KEY").is_ok() {
                Ok(Box::new(OpenAiResponder::new(config)?))
            } else {
                Ok(Box::new(DisabledResponder))
            }
        }
        other => bail!("Unknown fallback provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_responder_errors() {
        let responder = DisabledResponder;
        assert!(responder.reply("anything").await.is_err());
    }

    #[test]
    fn test_create_responder_disabled() {
        let config = FallbackConfig {
            provider: "disabled".to_string(),
            ..Default::default()
        };
        let responder = create_responder(&config).unwrap();
        assert_eq!(responder.name(), "disabled");
    }

    #[test]
    fn test_create_responder_unknown_provider() {
        let config = FallbackConfig {
            provider: "smoke-signals".to_string(),
            ..Default::default()
        };
        assert!(create_responder(&config).is_err());
    }

    #[test]
    fn test_parse_chat_reply_content() {
        let json = serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": "Hello there." } } ]
        });
        assert_eq!(parse_chat_reply(&json).unwrap(), "Hello there.");
    }

    #[test]
    fn test_parse_chat_reply_empty_content() {
        let json = serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": "" } } ]
        });
        assert_eq!(parse_chat_reply(&json).unwrap(), EMPTY_CONTENT_REPLY);

        let json = serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": null } } ]
        });
        assert_eq!(parse_chat_reply(&json).unwrap(), EMPTY_CONTENT_REPLY);
    }

    #[test]
    fn test_parse_chat_reply_missing_choices() {
        let json = serde_json::json!({ "error": { "message": "nope" } });
        assert!(parse_chat_reply(&json).is_err());

        let json = serde_json::json!({ "choices": [] });
        assert!(parse_chat_reply(&json).is_err());
    }
}
