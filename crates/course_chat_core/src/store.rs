//! crates/course_chat_core/src/store.rs
//!
//! Authoritative message logs and per-channel drafts.
//!
//! Both chat variants are kept in one append-only log in which every entry
//! remembers the channel it was created under. The channel mode only decides
//! what a channel's visible list is and how message ids are numbered.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{ChannelId, ChannelInfo, ChannelMode, Message, Role};
use crate::error::{ChatError, ChatResult};

struct Entry {
    channel: ChannelId,
    message: Message,
}

pub struct ChannelStore {
    mode: ChannelMode,
    channels: Vec<ChannelInfo>,
    log: Vec<Entry>,
    lengths: HashMap<ChannelId, usize>,
    drafts: HashMap<ChannelId, String>,
    updated: HashMap<ChannelId, DateTime<Utc>>,
}

impl ChannelStore {
    pub fn new(mode: ChannelMode, channels: Vec<ChannelInfo>) -> Self {
        let now = Utc::now();
        let lengths = channels.iter().map(|c| (c.id.clone(), 0)).collect();
        let drafts = channels.iter().map(|c| (c.id.clone(), String::new())).collect();
        let updated = channels.iter().map(|c| (c.id.clone(), now)).collect();
        Self {
            mode,
            channels,
            log: Vec::new(),
            lengths,
            drafts,
            updated,
        }
    }

    /// Adds an empty channel in front of the existing ones.
    pub fn create_channel(&mut self, info: ChannelInfo) -> ChatResult<()> {
        if self.info(&info.id).is_ok() {
            return Err(ChatError::DuplicateChannel(info.id));
        }
        self.lengths.insert(info.id.clone(), 0);
        self.drafts.insert(info.id.clone(), String::new());
        self.updated.insert(info.id.clone(), Utc::now());
        self.channels.insert(0, info);
        Ok(())
    }

    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    pub fn channels(&self) -> &[ChannelInfo] {
        &self.channels
    }

    pub fn info(&self, channel: &ChannelId) -> ChatResult<&ChannelInfo> {
        self.channels
            .iter()
            .find(|c| &c.id == channel)
            .ok_or_else(|| ChatError::UnknownChannel(channel.clone()))
    }

    /// Number of messages that were created under `channel`.
    pub fn len(&self, channel: &ChannelId) -> usize {
        self.lengths.get(channel).copied().unwrap_or(0)
    }

    /// When `channel` was created or last received a message.
    pub fn updated_at(&self, channel: &ChannelId) -> Option<DateTime<Utc>> {
        self.updated.get(channel).copied()
    }

    /// Appends a new message at the end of `channel`'s log and returns a copy of it.
    pub fn append_message(
        &mut self,
        channel: &ChannelId,
        role: Role,
        content: String,
    ) -> ChatResult<Message> {
        self.info(channel)?;
        let length = self.lengths.entry(channel.clone()).or_insert(0);
        *length += 1;

        let (id, channel_tag) = match self.mode {
            ChannelMode::PerChannel => (*length as u64, None),
            ChannelMode::Unified => (self.log.len() as u64 + 1, Some(channel.clone())),
        };
        let message = Message {
            id,
            role,
            content,
            timestamp: Utc::now(),
            channel_tag,
        };
        self.updated.insert(channel.clone(), message.timestamp);
        self.log.push(Entry {
            channel: channel.clone(),
            message: message.clone(),
        });
        Ok(message)
    }

    /// The list a reader of `channel` sees: its own log, or the shared log in unified mode.
    pub fn visible_messages(&self, channel: &ChannelId) -> Vec<Message> {
        self.log
            .iter()
            .filter(|entry| self.mode == ChannelMode::Unified || &entry.channel == channel)
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn draft(&self, channel: &ChannelId) -> &str {
        self.drafts.get(channel).map(String::as_str).unwrap_or("")
    }

    pub fn set_draft(&mut self, channel: &ChannelId, text: &str) -> ChatResult<()> {
        self.info(channel)?;
        self.drafts.insert(channel.clone(), text.to_string());
        Ok(())
    }

    pub fn clear_draft(&mut self, channel: &ChannelId) -> ChatResult<()> {
        self.set_draft(channel, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels() -> Vec<ChannelInfo> {
        vec![
            ChannelInfo::new("react", "React", "red"),
            ChannelInfo::new("java", "JAVA", "orange"),
        ]
    }

    #[test]
    fn per_channel_logs_number_and_show_independently() {
        let mut store = ChannelStore::new(ChannelMode::PerChannel, channels());
        let react = ChannelId::new("react");
        let java = ChannelId::new("java");

        store.append_message(&react, Role::User, "a".into()).unwrap();
        store.append_message(&java, Role::User, "b".into()).unwrap();
        let second = store.append_message(&react, Role::Assistant, "c".into()).unwrap();

        assert_eq!(second.id, 2);
        assert_eq!(second.channel_tag, None);
        assert_eq!(store.len(&react), 2);
        assert_eq!(store.len(&java), 1);
        let contents: Vec<_> = store
            .visible_messages(&react)
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["a", "c"]);
    }

    #[test]
    fn unified_log_is_shared_and_tagged() {
        let mut store = ChannelStore::new(ChannelMode::Unified, channels());
        let react = ChannelId::new("react");
        let java = ChannelId::new("java");

        store.append_message(&react, Role::User, "a".into()).unwrap();
        let tagged = store.append_message(&java, Role::User, "b".into()).unwrap();

        assert_eq!(tagged.id, 2);
        assert_eq!(tagged.channel_tag, Some(java.clone()));
        assert_eq!(store.len(&java), 1);
        assert_eq!(store.visible_messages(&react).len(), 2);
    }

    #[test]
    fn drafts_are_isolated_per_channel() {
        let mut store = ChannelStore::new(ChannelMode::PerChannel, channels());
        let react = ChannelId::new("react");
        let java = ChannelId::new("java");

        store.set_draft(&react, "hooks?").unwrap();
        store.set_draft(&java, "generics").unwrap();
        store.clear_draft(&java).unwrap();

        assert_eq!(store.draft(&react), "hooks?");
        assert_eq!(store.draft(&java), "");
    }

    #[test]
    fn unknown_channel_is_reported() {
        let mut store = ChannelStore::new(ChannelMode::PerChannel, channels());
        let err = store
            .append_message(&ChannelId::new("cobol"), Role::User, "x".into())
            .unwrap_err();
        assert_eq!(err, ChatError::UnknownChannel(ChannelId::new("cobol")));
        assert!(store.visible_messages(&ChannelId::new("react")).is_empty());
    }

    #[test]
    fn created_channel_goes_first_and_starts_empty() {
        let mut store = ChannelStore::new(ChannelMode::PerChannel, channels());
        let fresh = ChannelId::new("chat-9");
        let react = ChannelId::new("react");
        store.append_message(&react, Role::User, "a".into()).unwrap();

        store
            .create_channel(ChannelInfo::new("chat-9", "General", "blue").with_title("New Chat"))
            .unwrap();

        assert_eq!(store.channels()[0].id, fresh);
        assert_eq!(store.channels()[0].title, "New Chat");
        assert_eq!(store.len(&fresh), 0);
        assert_eq!(store.draft(&fresh), "");
        assert!(store.visible_messages(&fresh).is_empty());
        let first = store.append_message(&fresh, Role::User, "b".into()).unwrap();
        assert_eq!(first.id, 1);
    }

    #[test]
    fn duplicate_channel_is_refused() {
        let mut store = ChannelStore::new(ChannelMode::PerChannel, channels());
        let err = store
            .create_channel(ChannelInfo::new("java", "JAVA", "orange"))
            .unwrap_err();
        assert_eq!(err, ChatError::DuplicateChannel(ChannelId::new("java")));
        assert_eq!(store.channels().len(), 2);
    }

    #[test]
    fn append_moves_updated_at_forward() {
        let mut store = ChannelStore::new(ChannelMode::PerChannel, channels());
        let java = ChannelId::new("java");
        let created = store.updated_at(&java).unwrap();

        let message = store.append_message(&java, Role::User, "x".into()).unwrap();

        assert_eq!(store.updated_at(&java), Some(message.timestamp));
        assert!(message.timestamp >= created);
        assert_eq!(store.updated_at(&ChannelId::new("cobol")), None);
    }
}
