//! Error types for the conversation store.

use thiserror::Error;

use super::ids::ConversationId;

/// Conversation store error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced conversation is not (or no longer) in the store.
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),
    /// Attempted to delete the only remaining conversation.
    #[error("cannot delete the last remaining conversation")]
    LastConversation,
}

impl StoreError {
    /// Whether this error should be shown to the user as a notice.
    ///
    /// `NotFound` only happens with stale ids (late replies, bad wiring) and is
    /// logged instead.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::LastConversation)
    }
}

/// Convenience result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
