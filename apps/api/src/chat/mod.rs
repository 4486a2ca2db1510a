//! Chat Session — an ordered, persisted conversation plus a live handle to
//! the generation service.
//!
//! The transcript is durable: every mutation persists the full message list
//! under `chat_history_<identity>`. The handle is ephemeral and rebuilt from
//! the persisted transcript whenever a session opens, so the service sees
//! prior turns as context after a restart. Chat failures degrade into the
//! transcript as an assistant notice instead of a structured error; quota
//! for a turn is spent on acceptance, not on success, because the user's
//! message has already entered the live conversation by then.

pub mod handlers;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::entitlement::Entitlement;
use crate::errors::GenerationError;
use crate::generation::backend::GenerationBackend;
use crate::llm_client::LlmError;
use crate::models::chat::{ChatMessage, ChatRole};
use crate::quota::{FeatureKey, QuotaConfig};
use crate::store::{KvStore, StoreError};
use crate::usage::{UsageKey, UsageLedger};

const CHAT_SYSTEM: &str = "You are Coach AI, a pragmatic career coach. \
    Give quick, direct, actionable advice in markdown. Keep answers short \
    and concrete; ask one clarifying question when the request is vague.";

/// Appended as the assistant turn when the service call fails.
const CONNECTION_ERROR_NOTICE: &str = "Connection error.";

fn history_key(identity: &str) -> String {
    format!("chat_history_{identity}")
}

fn greeting(display_name: &str) -> ChatMessage {
    ChatMessage::now(
        ChatRole::Assistant,
        format!("Hi {display_name}! How can I help your career today?"),
    )
}

/// The ephemeral connection capability. Owning it is what makes a session
/// "live"; it is discarded whenever the owner identity changes and never
/// persisted.
struct ChatHandle {
    backend: Arc<dyn GenerationBackend>,
}

impl ChatHandle {
    fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// One conversational turn; `transcript` ends with the user's latest
    /// message.
    async fn reply(&self, transcript: &[ChatMessage]) -> Result<String, LlmError> {
        self.backend.converse(CHAT_SYSTEM, transcript).await
    }
}

/// One owner's conversation: the durable transcript plus the live handle.
pub struct ChatSession {
    owner_identity: String,
    messages: Vec<ChatMessage>,
    handle: ChatHandle,
}

/// Owns the single live session slot and the collaborators a turn needs.
/// Switching identity is always a full replacement of the slot.
pub struct ChatService {
    store: Arc<dyn KvStore>,
    backend: Arc<dyn GenerationBackend>,
    ledger: UsageLedger,
    entitlement: Entitlement,
    quotas: QuotaConfig,
    session: Mutex<Option<ChatSession>>,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn KvStore>,
        backend: Arc<dyn GenerationBackend>,
        ledger: UsageLedger,
        entitlement: Entitlement,
        quotas: QuotaConfig,
    ) -> Self {
        Self {
            store,
            backend,
            ledger,
            entitlement,
            quotas,
            session: Mutex::new(None),
        }
    }

    /// Opens (or replaces) the session for `identity` and returns its
    /// transcript. A brand-new identity is seeded with a single greeting.
    pub async fn open(
        &self,
        identity: &str,
        display_name: &str,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let session = self.load_session(identity, display_name).await?;
        let transcript = session.messages.clone();
        *self.session.lock().await = Some(session);
        info!(identity, messages = transcript.len(), "chat session opened");
        Ok(transcript)
    }

    /// One conversational turn. Returns the assistant message appended to
    /// the transcript — which is a connection-error notice when the service
    /// call fails; only empty input and quota exhaustion surface as errors.
    pub async fn send(
        &self,
        identity: &str,
        display_name: &str,
        text: &str,
    ) -> Result<ChatMessage, GenerationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::Input("message cannot be empty".to_string()));
        }

        let mut guard = self.session.lock().await;
        let session = match guard.take() {
            // Same identity keeps its live handle and transcript.
            Some(live) if live.owner_identity == identity => guard.insert(live),
            // A different (or no) identity held the slot: full replacement,
            // old handle discarded.
            _ => guard.insert(self.load_session(identity, display_name).await?),
        };

        let premium = self.entitlement.is_premium().await?;
        let key = UsageKey::today(FeatureKey::Chat);
        if !premium {
            if let Some(limit) = self.quotas.free_limit(FeatureKey::Chat) {
                if self.ledger.usage(key).await? >= limit {
                    return Err(GenerationError::QuotaExceeded {
                        feature: FeatureKey::Chat,
                        limit,
                    });
                }
            }
        }

        // Optimistic append: the user's turn enters the transcript (and the
        // counter, for free accounts) whether or not the reply succeeds.
        session.messages.push(ChatMessage::now(ChatRole::User, text));
        persist(&*self.store, session).await?;
        if !premium {
            self.ledger.increment(key).await?;
        }

        let reply = match session.handle.reply(&session.messages).await {
            Ok(answer) => ChatMessage::now(ChatRole::Assistant, answer),
            Err(e) => {
                warn!(identity, "chat turn failed: {e}");
                ChatMessage::now(ChatRole::Assistant, CONNECTION_ERROR_NOTICE)
            }
        };
        session.messages.push(reply.clone());
        persist(&*self.store, session).await?;

        Ok(reply)
    }

    /// Read-only transcript lookup. Serves the live session when `identity`
    /// owns it, otherwise the persisted history — without disturbing the
    /// slot.
    pub async fn history(&self, identity: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let guard = self.session.lock().await;
        if let Some(live) = guard.as_ref() {
            if live.owner_identity == identity {
                return Ok(live.messages.clone());
            }
        }
        drop(guard);

        match self.store.get(&history_key(identity)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn load_session(
        &self,
        identity: &str,
        display_name: &str,
    ) -> Result<ChatSession, StoreError> {
        let messages = match self.store.get(&history_key(identity)).await? {
            Some(raw) => match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
                Ok(messages) if !messages.is_empty() => messages,
                Ok(_) => vec![greeting(display_name)],
                Err(e) => {
                    warn!(identity, "discarding unreadable chat transcript: {e}");
                    vec![greeting(display_name)]
                }
            },
            None => vec![greeting(display_name)],
        };

        let session = ChatSession {
            owner_identity: identity.to_string(),
            messages,
            handle: ChatHandle::new(self.backend.clone()),
        };
        // Persist the seed so a fresh transcript survives a restart too.
        persist(&*self.store, &session).await?;
        Ok(session)
    }
}

async fn persist(store: &dyn KvStore, session: &ChatSession) -> Result<(), StoreError> {
    let raw = serde_json::to_string(&session.messages)?;
    store.put(&history_key(&session.owner_identity), &raw).await
}
