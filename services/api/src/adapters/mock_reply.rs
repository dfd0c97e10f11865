//! services/api/src/adapters/mock_reply.rs
//!
//! Implements the `ReplyComposer` port with a fixed template. There is no
//! model behind it: the answer only echoes the prompt and the channel label.

use async_trait::async_trait;
use course_chat_core::domain::ChannelInfo;
use course_chat_core::ports::{PortResult, ReplyComposer};

#[derive(Clone, Debug, Default)]
pub struct MockReplyComposer;

impl MockReplyComposer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReplyComposer for MockReplyComposer {
    async fn compose_reply(&self, prompt: &str, channel: &ChannelInfo) -> PortResult<String> {
        Ok(format!(
            "I understand you're asking about \"{}\". This is a mock response for {}. In a real implementation, this would connect to your AI backend.",
            prompt, channel.label
        ))
    }
}
