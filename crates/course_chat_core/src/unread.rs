//! crates/course_chat_core/src/unread.rs
//!
//! Derives unread badge counts from log length against a last-seen watermark.

use std::collections::HashMap;

use crate::domain::ChannelId;

#[derive(Debug, Default)]
pub struct UnreadTracker {
    watermarks: HashMap<ChannelId, usize>,
    counts: HashMap<ChannelId, usize>,
}

impl UnreadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `channel` as read up to `log_len`. Used on activation and at mount.
    pub fn mark_seen(&mut self, channel: &ChannelId, log_len: usize) {
        self.watermarks.insert(channel.clone(), log_len);
        self.counts.insert(channel.clone(), 0);
    }

    /// Records that `channel` now holds `log_len` messages.
    pub fn on_append(&mut self, channel: &ChannelId, active: &ChannelId, log_len: usize) {
        if channel == active {
            self.mark_seen(channel, log_len);
            return;
        }
        let seen = self.watermark(channel);
        self.counts
            .insert(channel.clone(), log_len.saturating_sub(seen));
    }

    pub fn unread(&self, channel: &ChannelId) -> usize {
        self.counts.get(channel).copied().unwrap_or(0)
    }

    pub fn watermark(&self, channel: &ChannelId) -> usize {
        self.watermarks.get(channel).copied().unwrap_or(0)
    }
}
