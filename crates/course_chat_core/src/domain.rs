//! crates/course_chat_core/src/domain.rs
//!
//! Defines the pure, core data structures for the course chat assistant.
//! These structs are independent of any transport or storage adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a message. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A stable channel identifier such as `react` or `java`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single chat message. Never mutated once appended to a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Only set in the unified variant, where every message is tagged with
    /// the channel that was selected when it was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_tag: Option<ChannelId>,
}

/// How the logs of a session are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelMode {
    /// Every channel shows only its own messages.
    PerChannel,
    /// One shared log is shown; messages carry a channel tag.
    Unified,
}

/// The two assistant panels offered by the dashboard menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Copilot {
    #[default]
    #[serde(rename = "co-pilot")]
    CoPilot,
    #[serde(rename = "co-pilot2")]
    CoPilot2,
    /// The full-page assistant with a sidebar of user-created conversations.
    #[serde(rename = "chat-gpt")]
    Conversations,
}

impl Copilot {
    pub fn channel_mode(self) -> ChannelMode {
        match self {
            Copilot::CoPilot => ChannelMode::PerChannel,
            Copilot::CoPilot2 => ChannelMode::Unified,
            Copilot::Conversations => ChannelMode::PerChannel,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Copilot::CoPilot => "Co-Pilot",
            Copilot::CoPilot2 => "Co-Pilot 2",
            Copilot::Conversations => "ChatGPT Style Page",
        }
    }

    /// Whether the user may start new conversations in this panel.
    pub fn allows_new_chats(self) -> bool {
        matches!(self, Copilot::Conversations)
    }
}

/// Display metadata for one channel (a course tab, course tag or conversation).
///
/// `label` is the course the channel talks about; `title` is what a
/// conversation sidebar shows and defaults to the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub label: String,
    pub color: String,
    pub title: String,
}

impl ChannelInfo {
    pub fn new(id: &str, label: &str, color: &str) -> Self {
        Self {
            id: ChannelId::new(id),
            label: label.to_string(),
            color: color.to_string(),
            title: label.to_string(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

/// What a tab or pill needs to render: the channel plus its unread badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub id: ChannelId,
    pub label: String,
    pub color: String,
    pub title: String,
    /// Creation time, moved forward by every message appended to the channel.
    pub updated_at: DateTime<Utc>,
    pub unread: usize,
    pub active: bool,
}

/// The signed-in user, as stored JSON-encoded under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copilot_uses_dashboard_names_on_the_wire() {
        assert_eq!(serde_json::to_string(&Copilot::CoPilot2).unwrap(), "\"co-pilot2\"");
        let parsed: Copilot = serde_json::from_str("\"co-pilot\"").unwrap();
        assert_eq!(parsed, Copilot::CoPilot);
        let page: Copilot = serde_json::from_str("\"chat-gpt\"").unwrap();
        assert!(page.allows_new_chats());
        assert!(!Copilot::CoPilot2.allows_new_chats());
    }

    #[test]
    fn profile_id_is_optional() {
        let user: UserProfile =
            serde_json::from_str(r#"{"email":"a@b.c","name":"Demo User"}"#).unwrap();
        assert_eq!(user.id, None);
        assert_eq!(user.name, "Demo User");
    }
}
