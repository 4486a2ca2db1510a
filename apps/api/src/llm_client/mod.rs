/// LLM Client — the single point of entry for all generation-service calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All artifact and chat generation MUST go through this module (behind the
/// `GenerationBackend` seam).
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::chat::ChatMessage;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl ApiResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client shared by all features.
/// Wraps the Anthropic Messages API with retry logic; supports both one-shot
/// artifact prompts and multi-turn conversation context.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// One-shot completion for artifact generation.
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.call(system, vec![ApiMessage { role: "user", content: prompt }])
            .await
    }

    /// Conversational completion: the whole transcript is forwarded so the
    /// service can use prior turns as context. The final entry is expected
    /// to be the user's latest message.
    pub async fn converse(
        &self,
        system: &str,
        transcript: &[ChatMessage],
    ) -> Result<String, LlmError> {
        let messages = transcript
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_wire(),
                content: &m.text,
            })
            .collect();
        self.call(system, messages).await
    }

    /// Makes a raw call to the Claude API, returning the reply text.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    async fn call(
        &self,
        system: &str,
        messages: Vec<ApiMessage<'_>>,
    ) -> Result<String, LlmError> {
        let request_body = ApiRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let api_response: ApiResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                api_response.usage.input_tokens, api_response.usage.output_tokens
            );

            let text = api_response.text().ok_or(LlmError::EmptyContent)?;
            return Ok(text.to_string());
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub(crate) fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n[{\"question\": \"Why us?\"}]\n```";
        assert_eq!(strip_json_fences(input), "[{\"question\": \"Why us?\"}]");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n[{\"question\": \"Why us?\"}]\n```";
        assert_eq!(strip_json_fences(input), "[{\"question\": \"Why us?\"}]");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "[{\"question\": \"Why us?\"}]";
        assert_eq!(strip_json_fences(input), "[{\"question\": \"Why us?\"}]");
    }
}
