//! crates/course_chat_core/src/error.rs
//!
//! Errors raised by the chat session state machine.

use crate::domain::ChannelId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// Submit called with blank or whitespace-only text.
    #[error("Submission rejected: input is empty")]
    EmptyInputRejected,

    /// Submit called while a simulated reply is still pending.
    #[error("Submission rejected: a reply is already pending")]
    ConcurrentSubmitRejected,

    #[error("Unknown channel: {0}")]
    UnknownChannel(ChannelId),

    #[error("No reply is pending for this session")]
    NoPendingReply,

    #[error("A session needs at least one channel")]
    EmptyCatalog,

    #[error("New chats cannot be started in this panel")]
    ChannelCreationDisabled,

    #[error("Channel already exists: {0}")]
    DuplicateChannel(ChannelId),
}

impl ChatError {
    /// Rejections the UI swallows without showing anything.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            ChatError::EmptyInputRejected | ChatError::ConcurrentSubmitRejected
        )
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
