use crate::agent::patterns::WELCOME_MESSAGE;
use crate::agent::{ConversationHistory, Resolution};
use crate::errors::AppError;
use crate::models::ChatMessage;

pub const MAX_MESSAGE_LENGTH: usize = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    /// A reply is being composed; further utterances are rejected.
    Sending,
}

/// A turn that left `Idle` and is waiting for its reply.
///
/// Carries the conversation history out of the conversation for the duration
/// of the remote call, so no lock is held while it is in flight.
#[derive(Debug)]
pub struct PendingTurn {
    pub utterance: String,
    pub history: ConversationHistory,
    epoch: u64,
}

/// One visitor's chat: transcript, model context and send state.
#[derive(Debug)]
pub struct Conversation {
    id: String,
    state: ConversationState,
    transcript: Vec<ChatMessage>,
    history: ConversationHistory,
    /// Bumped on every reset; a turn begun under an older epoch does not
    /// write its history back.
    epoch: u64,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: ConversationState::Idle,
            transcript: vec![ChatMessage::agent(WELCOME_MESSAGE)],
            history: ConversationHistory::new(),
            epoch: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn is_composing(&self) -> bool {
        self.state == ConversationState::Sending
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// `Idle -> Sending`. Records the visitor's message in the transcript.
    ///
    /// Rejected utterances leave the conversation untouched.
    pub fn begin(&mut self, utterance: &str) -> Result<PendingTurn, AppError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(AppError::EmptyField { field_name: "message".to_string() });
        }
        if utterance.len() > MAX_MESSAGE_LENGTH {
            return Err(AppError::FieldTooLong {
                field_name: "message".to_string(),
                max_length: MAX_MESSAGE_LENGTH,
                actual_length: utterance.len(),
            });
        }
        if self.state == ConversationState::Sending {
            return Err(AppError::ConversationBusy { id: self.id.clone() });
        }

        self.state = ConversationState::Sending;
        self.transcript.push(ChatMessage::user(utterance));
        Ok(PendingTurn {
            utterance: utterance.to_string(),
            history: std::mem::take(&mut self.history),
            epoch: self.epoch,
        })
    }

    /// `Sending -> Idle`. Appends the reply, whichever backend produced it.
    pub fn finish(&mut self, pending: PendingTurn, resolution: &Resolution) -> ChatMessage {
        if pending.epoch == self.epoch {
            self.history = pending.history;
        }
        let reply = ChatMessage::agent(resolution.reply());
        self.transcript.push(reply.clone());
        self.state = ConversationState::Idle;
        reply
    }

    /// `Sending -> Idle` for a turn that will never finish. Its model context
    /// is lost.
    pub fn abandon(&mut self) {
        self.history.reset();
        self.epoch += 1;
        self.state = ConversationState::Idle;
    }

    /// Clears the model context. The transcript is kept.
    pub fn reset(&mut self) {
        self.history.reset();
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FallbackReason;
    use crate::models::{Sender, Turn};

    fn remote(reply: &str) -> Resolution {
        Resolution::Remote(reply.to_string())
    }

    #[test]
    fn starts_idle_with_welcome() {
        let conv = Conversation::new("c1");
        assert_eq!(conv.state(), ConversationState::Idle);
        assert_eq!(conv.transcript().len(), 1);
        assert_eq!(conv.transcript()[0].content, WELCOME_MESSAGE);
        assert_eq!(conv.transcript()[0].sender, Sender::Agent);
    }

    #[test]
    fn second_begin_is_rejected_while_sending() {
        let mut conv = Conversation::new("c1");
        let _pending = conv.begin("Bonjour").unwrap();
        assert!(conv.is_composing());

        let err = conv.begin("Encore moi").unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(conv.transcript().len(), 2);
    }

    #[test]
    fn empty_utterance_does_not_leave_idle() {
        let mut conv = Conversation::new("c1");
        assert!(conv.begin("   ").unwrap_err().is_validation());
        assert_eq!(conv.state(), ConversationState::Idle);
        assert_eq!(conv.transcript().len(), 1);
    }

    #[test]
    fn overlong_utterance_is_rejected() {
        let mut conv = Conversation::new("c1");
        let err = conv.begin(&"a".repeat(MAX_MESSAGE_LENGTH + 1)).unwrap_err();
        assert!(matches!(err, AppError::FieldTooLong { .. }));
    }

    #[test]
    fn finish_returns_to_idle_and_restores_history() {
        let mut conv = Conversation::new("c1");
        let mut pending = conv.begin("  Bonjour ").unwrap();
        assert_eq!(pending.utterance, "Bonjour");
        pending.history.push(Turn::user("Bonjour"));
        pending.history.push(Turn::agent("Salutations"));

        let reply = conv.finish(pending, &remote("Salutations"));

        assert_eq!(reply.content, "Salutations");
        assert_eq!(conv.state(), ConversationState::Idle);
        assert_eq!(conv.history().len(), 2);
        assert_eq!(conv.transcript().len(), 3);
    }

    #[test]
    fn fallback_finishes_like_success() {
        let mut conv = Conversation::new("c1");
        let pending = conv.begin("prix").unwrap();
        let fallback = Resolution::Fallback {
            reply: "local",
            reason: FallbackReason::Protocol,
        };
        let reply = conv.finish(pending, &fallback);
        assert_eq!(reply.content, "local");
        assert_eq!(conv.state(), ConversationState::Idle);
    }

    #[test]
    fn reset_during_send_discards_in_flight_history() {
        let mut conv = Conversation::new("c1");
        let mut pending = conv.begin("Bonjour").unwrap();
        pending.history.push(Turn::user("Bonjour"));
        pending.history.push(Turn::agent("Salut"));

        conv.reset();
        conv.finish(pending, &remote("Salut"));

        assert!(conv.history().is_empty());
        assert_eq!(conv.transcript().len(), 3);
    }

    #[test]
    fn abandoned_turn_accepts_the_next_utterance() {
        let mut conv = Conversation::new("c1");
        let _lost = conv.begin("Bonjour").unwrap();
        conv.abandon();

        assert_eq!(conv.state(), ConversationState::Idle);
        assert!(conv.begin("Encore").is_ok());
        assert!(conv.history().is_empty());
        assert_eq!(conv.transcript().len(), 3);
    }

    #[test]
    fn reset_keeps_transcript() {
        let mut conv = Conversation::new("c1");
        let mut pending = conv.begin("Bonjour").unwrap();
        pending.history.push(Turn::user("Bonjour"));
        pending.history.push(Turn::agent("Salut"));
        conv.finish(pending, &remote("Salut"));

        conv.reset();

        assert!(conv.history().is_empty());
        assert_eq!(conv.transcript().len(), 3);
    }
}
