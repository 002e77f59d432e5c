use crate::models::{Role, Turn};

/// Number of turns kept as context for the remote model.
pub const HISTORY_CAP: usize = 16;

/// Role-tagged turns replayed to the completion endpoint.
///
/// Owned by exactly one conversation. Holds only user and agent turns; the
/// system prompt is prepended when a request is built.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
    cap: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_cap(HISTORY_CAP)
    }
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(cap: usize) -> Self {
        Self { turns: Vec::new(), cap }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Removes the most recent turn if it is a user turn.
    ///
    /// Used to undo the speculative user turn of a failed completion.
    pub fn rollback_user_turn(&mut self) -> Option<Turn> {
        match self.turns.last() {
            Some(turn) if turn.role == Role::User => self.turns.pop(),
            _ => None,
        }
    }

    /// Drops the oldest turns until at most `cap` remain.
    pub fn trim(&mut self) {
        if self.turns.len() > self.cap {
            let excess = self.turns.len() - self.cap;
            self.turns.drain(..excess);
        }
    }

    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}
