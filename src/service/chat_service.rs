use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::agent::{CompletionBackend, MistralClient, Resolution, Resolver};
use crate::config::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_SECS};
use crate::errors::AppError;
use crate::models::{ChatMessage, ChatRequest, ChatResponse, StatusResponse};
use crate::service::conversation::{Conversation, PendingTurn};

/// Receives the events of a [`ChatSession`].
pub trait ChatListener: Send + Sync {
    fn on_reply(&self, _message: &ChatMessage) {}
    fn on_composing_change(&self, _composing: bool) {}
}

/// Drives one conversation: at most one utterance in flight, every utterance
/// answered.
pub struct ChatSession<B> {
    id: Arc<str>,
    resolver: Arc<Resolver<B>>,
    conversation: Arc<Mutex<Conversation>>,
    listener: Option<Arc<dyn ChatListener>>,
}

impl<B> Clone for ChatSession<B> {
    fn clone(&self) -> Self {
        Self {
            id: Arc::clone(&self.id),
            resolver: Arc::clone(&self.resolver),
            conversation: Arc::clone(&self.conversation),
            listener: self.listener.clone(),
        }
    }
}

impl<B: CompletionBackend + 'static> ChatSession<B> {
    pub fn new(resolver: Arc<Resolver<B>>, id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self {
            id: Arc::from(id.as_str()),
            resolver,
            conversation: Arc::new(Mutex::new(Conversation::new(id))),
            listener: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// A handle on the same conversation that reports to `listener`.
    pub fn with_listener(&self, listener: Arc<dyn ChatListener>) -> Self {
        Self { listener: Some(listener), ..self.clone() }
    }

    /// Resolves `text` and returns the agent's reply.
    ///
    /// Fails only when the utterance is rejected (empty, too long, or another
    /// one is still composing); resolution itself always yields a reply.
    ///
    /// Once accepted, the turn runs on its own task and reaches `Idle` even if
    /// the returned future is dropped.
    pub async fn submit_utterance(&self, text: &str) -> Result<ChatMessage, AppError> {
        let pending = self.conversation.lock().await.begin(text)?;
        self.composing_changed(true);

        match tokio::spawn(self.clone().complete_turn(pending)).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                error!("Conversation {}: reply task failed: {e}", self.id);
                self.conversation.lock().await.abandon();
                self.composing_changed(false);
                Err(AppError::Unexpected(format!("reply task failed: {e}")))
            }
        }
    }

    async fn complete_turn(self, mut pending: PendingTurn) -> ChatMessage {
        let resolution = self.resolver.resolve(&pending.utterance, &mut pending.history).await;
        match &resolution {
            Resolution::Remote(_) => debug!("Conversation {}: remote reply", self.id),
            Resolution::Fallback { reason, .. } => {
                debug!("Conversation {}: local reply ({reason})", self.id)
            }
        }

        let reply = self.conversation.lock().await.finish(pending, &resolution);
        if let Some(listener) = &self.listener {
            listener.on_reply(&reply);
        }
        self.composing_changed(false);
        reply
    }

    /// Closes the chat: the model context starts over, the transcript stays.
    pub async fn reset(&self) {
        self.conversation.lock().await.reset();
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.conversation.lock().await.transcript().to_vec()
    }

    pub async fn history_len(&self) -> usize {
        self.conversation.lock().await.history().len()
    }

    pub async fn is_composing(&self) -> bool {
        self.conversation.lock().await.is_composing()
    }

    fn composing_changed(&self, composing: bool) {
        if let Some(listener) = &self.listener {
            listener.on_composing_change(composing);
        }
    }
}

/// Bounds on the conversations a [`ChatService`] keeps in memory.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub max_sessions: usize,
    pub idle_timeout: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

struct Entry<B> {
    session: ChatSession<B>,
    last_seen: Instant,
}

/// Registry of chat sessions keyed by conversation id.
pub struct ChatService<B = MistralClient> {
    resolver: Arc<Resolver<B>>,
    sessions: Arc<Mutex<HashMap<String, Entry<B>>>>,
    limits: SessionLimits,
}

impl<B> Clone for ChatService<B> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            sessions: Arc::clone(&self.sessions),
            limits: self.limits,
        }
    }
}

impl ChatService<MistralClient> {
    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            remote_enabled: self.resolver.is_remote_enabled(),
            model: self.resolver.backend().map(|b| b.model().to_string()),
        }
    }
}

impl<B: CompletionBackend + 'static> ChatService<B> {
    pub fn new(resolver: Resolver<B>) -> Self {
        Self::with_limits(resolver, SessionLimits::default())
    }

    pub fn with_limits(resolver: Resolver<B>, limits: SessionLimits) -> Self {
        Self {
            resolver: Arc::new(resolver),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            limits,
        }
    }

    /// Returns the session for `id`, creating it (under a fresh id when
    /// `None`) if needed.
    ///
    /// Creating a session first forgets idle ones, then the least recently
    /// used while the registry is full.
    pub async fn session(&self, id: Option<String>) -> ChatSession<B> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        if let Some(entry) = sessions.get_mut(&id) {
            entry.last_seen = now;
            return entry.session.clone();
        }

        self.evict(&mut sessions, now);
        info!("Opening conversation {id}");
        let session = ChatSession::new(Arc::clone(&self.resolver), id.clone());
        sessions.insert(id, Entry { session: session.clone(), last_seen: now });
        session
    }

    fn evict(&self, sessions: &mut HashMap<String, Entry<B>>, now: Instant) {
        let idle_timeout = self.limits.idle_timeout;
        sessions.retain(|id, entry| {
            let keep = now.duration_since(entry.last_seen) < idle_timeout;
            if !keep {
                debug!("Forgetting idle conversation {id}");
            }
            keep
        });

        while sessions.len() >= self.limits.max_sessions.max(1) {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            debug!("Registry full, forgetting conversation {oldest}");
            sessions.remove(&oldest);
        }
    }

    pub async fn find(&self, id: &str) -> Result<ChatSession<B>, AppError> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::ConversationNotFound { id: id.to_string() })?;
        entry.last_seen = Instant::now();
        Ok(entry.session.clone())
    }

    /// Forgets the conversation entirely. Returns whether it existed.
    pub async fn close(&self, id: &str) -> bool {
        let removed = self.sessions.lock().await.remove(id);
        match removed {
            Some(entry) => {
                entry.session.reset().await;
                info!("Conversation {id} closed");
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        let conversation_id = request
            .conversation_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let session = self.session(Some(conversation_id.clone())).await;
        let message = session.submit_utterance(&request.message).await?;

        Ok(ChatResponse { conversation_id, message })
    }

    pub async fn get_messages(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, AppError> {
        Ok(self.find(conversation_id).await?.transcript().await)
    }

    pub async fn reset_history(&self, conversation_id: &str) -> Result<(), AppError> {
        self.find(conversation_id).await?.reset().await;
        info!("Conversation {conversation_id} history reset");
        Ok(())
    }
}
