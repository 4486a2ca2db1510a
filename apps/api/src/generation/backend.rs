//! Generation backend — the seam between the core and the external
//! text-generation service.
//!
//! `AppState` holds an `Arc<dyn GenerationBackend>`: production wires the
//! LLM client, tests wire a scripted double. Nothing above this trait knows
//! whether a real service was called.

use async_trait::async_trait;

use crate::llm_client::{LlmClient, LlmError};
use crate::models::chat::ChatMessage;

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// One-shot artifact generation.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    /// Conversational turn. `transcript` carries the prior turns plus the
    /// user's latest message as its final entry.
    async fn converse(
        &self,
        system: &str,
        transcript: &[ChatMessage],
    ) -> Result<String, LlmError>;
}

/// Production backend: forwards to the LLM client.
pub struct LlmBackend {
    client: LlmClient,
}

impl LlmBackend {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenerationBackend for LlmBackend {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.client.complete(system, prompt).await
    }

    async fn converse(
        &self,
        system: &str,
        transcript: &[ChatMessage],
    ) -> Result<String, LlmError> {
        self.client.converse(system, transcript).await
    }
}
