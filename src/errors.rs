use thiserror::Error;

/// Top-level application error surfaced by the HTTP layer.
/// All variants carry a human-readable message for display/logging.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong { field_name: String, max_length: usize, actual_length: usize },

    #[error("Invalid quiz submission: {0}")]
    InvalidQuiz(String),

    // ── Conversation errors ──────────────────────────────────────────────────
    #[error("Conversation '{id}' not found")]
    ConversationNotFound { id: String },

    #[error("Conversation '{id}' is still composing a reply")]
    ConversationBusy { id: String },

    // ── Catalogue errors ─────────────────────────────────────────────────────
    #[error("Destination '{id}' not found")]
    UnknownDestination { id: String },

    // ── Internal errors ──────────────────────────────────────────────────────
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ConversationNotFound { .. } | AppError::UnknownDestination { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::EmptyField { .. }
                | AppError::FieldTooLong { .. }
                | AppError::InvalidQuiz(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::ConversationBusy { .. })
    }
}

/// Failure of a single remote completion attempt.
///
/// Never leaves the resolver: every variant is converted into a
/// [`FallbackReason`] and answered by the local pattern matcher.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("completion request timed out")]
    Timeout,

    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion body: {0}")]
    Malformed(String),

    #[error("completion body carried no reply")]
    EmptyReply,
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CompletionError::Timeout
        } else if e.is_decode() {
            CompletionError::Malformed(e.to_string())
        } else {
            CompletionError::Transport(e)
        }
    }
}

/// Why a reply came from the local pattern table instead of the remote model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No credential configured; the remote call was never attempted.
    ConfigurationAbsent,
    /// Network, DNS or timeout failure reaching the endpoint.
    Transport,
    /// Non-success status, or a body without a usable reply.
    Protocol,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::ConfigurationAbsent => "configuration_absent",
            FallbackReason::Transport => "transport",
            FallbackReason::Protocol => "protocol",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&CompletionError> for FallbackReason {
    fn from(e: &CompletionError) -> Self {
        match e {
            CompletionError::Transport(_) | CompletionError::Timeout => FallbackReason::Transport,
            CompletionError::Status { .. }
            | CompletionError::Malformed(_)
            | CompletionError::EmptyReply => FallbackReason::Protocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_failures_share_a_reason() {
        let status = CompletionError::Status { status: 500, body: String::new() };
        assert_eq!(FallbackReason::from(&status), FallbackReason::Protocol);
        assert_eq!(FallbackReason::from(&CompletionError::EmptyReply), FallbackReason::Protocol);
        assert_eq!(
            FallbackReason::from(&CompletionError::Malformed("eof".into())),
            FallbackReason::Protocol
        );
    }

    #[test]
    fn timeout_is_a_transport_failure() {
        assert_eq!(FallbackReason::from(&CompletionError::Timeout), FallbackReason::Transport);
    }

    #[test]
    fn classification_helpers() {
        assert!(AppError::EmptyField { field_name: "message".into() }.is_validation());
        assert!(AppError::ConversationNotFound { id: "x".into() }.is_not_found());
        assert!(AppError::ConversationBusy { id: "x".into() }.is_conflict());
        assert!(!AppError::ConversationBusy { id: "x".into() }.is_validation());
        let unexpected = AppError::Unexpected("reply task failed".into());
        assert!(!unexpected.is_validation() && !unexpected.is_not_found() && !unexpected.is_conflict());
    }
}
