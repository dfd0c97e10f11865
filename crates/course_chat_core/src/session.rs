//! crates/course_chat_core/src/session.rs
//!
//! The multi-channel chat session: channel store, unread tracking, channel
//! switching and the single-flight reply gate, all behind one owner.
//!
//! The session itself never waits. `submit` hands back a [`PendingReply`]
//! and whoever drives the session delivers it later via `complete_reply`.

use crate::catalog::Catalog;
use crate::domain::{
    ChannelId, ChannelInfo, ChannelMode, ChannelSummary, Message, Role,
};
use crate::error::{ChatError, ChatResult};
use crate::store::ChannelStore;
use crate::unread::UnreadTracker;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplyPhase {
    Idle,
    AwaitingReply { channel: ChannelId },
}

/// A reply owed to the user for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub channel: ChannelInfo,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Unchanged,
    Switched { previous: ChannelId },
}

pub struct ChatSession {
    store: ChannelStore,
    unread: UnreadTracker,
    active: ChannelId,
    phase: ReplyPhase,
    typing_visible: bool,
    allows_new_chats: bool,
    next_chat: usize,
}

impl ChatSession {
    /// Creates a session with no messages. Every channel starts fully read.
    pub fn new(
        mode: ChannelMode,
        channels: Vec<ChannelInfo>,
        active: ChannelId,
    ) -> ChatResult<Self> {
        if channels.is_empty() {
            return Err(ChatError::EmptyCatalog);
        }
        let store = ChannelStore::new(mode, channels);
        store.info(&active)?;

        let mut unread = UnreadTracker::new();
        for channel in store.channels() {
            unread.mark_seen(&channel.id, 0);
        }
        let next_chat = store.channels().len() + 1;
        Ok(Self {
            store,
            unread,
            active,
            phase: ReplyPhase::Idle,
            typing_visible: false,
            allows_new_chats: false,
            next_chat,
        })
    }

    /// Mounts a session with the catalog's channels and seed messages.
    pub fn from_catalog(catalog: Catalog) -> ChatResult<Self> {
        let mut session = Self::new(catalog.mode, catalog.channels, catalog.initial_active)?;
        session.allows_new_chats = catalog.allows_new_chats;
        for seed in catalog.seed {
            session
                .store
                .append_message(&seed.channel, Role::Assistant, seed.content)?;
        }
        let ids: Vec<ChannelId> = session.store.channels().iter().map(|c| c.id.clone()).collect();
        for id in ids {
            let len = session.store.len(&id);
            session.unread.mark_seen(&id, len);
        }
        Ok(session)
    }

    //=====================================================================================
    // Read model
    //=====================================================================================

    pub fn mode(&self) -> ChannelMode {
        self.store.mode()
    }

    pub fn active_channel(&self) -> &ChannelId {
        &self.active
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.phase, ReplyPhase::AwaitingReply { .. })
    }

    /// Whether the "assistant is typing" bubble should show.
    pub fn typing_indicator(&self) -> bool {
        self.typing_visible
    }

    pub fn channel_summaries(&self) -> Vec<ChannelSummary> {
        self.store
            .channels()
            .iter()
            .map(|c| ChannelSummary {
                id: c.id.clone(),
                label: c.label.clone(),
                color: c.color.clone(),
                title: c.title.clone(),
                updated_at: self.store.updated_at(&c.id).unwrap_or_default(),
                unread: self.unread.unread(&c.id),
                active: c.id == self.active,
            })
            .collect()
    }

    pub fn unread_count(&self, channel: &ChannelId) -> usize {
        self.unread.unread(channel)
    }

    pub fn watermark(&self, channel: &ChannelId) -> usize {
        self.unread.watermark(channel)
    }

    /// Messages created under `channel`.
    pub fn log_len(&self, channel: &ChannelId) -> usize {
        self.store.len(channel)
    }

    pub fn messages(&self, channel: &ChannelId) -> Vec<Message> {
        self.store.visible_messages(channel)
    }

    pub fn active_messages(&self) -> Vec<Message> {
        self.store.visible_messages(&self.active)
    }

    pub fn draft(&self, channel: &ChannelId) -> &str {
        self.store.draft(channel)
    }

    pub fn active_draft(&self) -> &str {
        self.store.draft(&self.active)
    }

    //=====================================================================================
    // Mutations
    //=====================================================================================

    pub fn set_draft(&mut self, channel: &ChannelId, text: &str) -> ChatResult<()> {
        self.store.set_draft(channel, text)
    }

    /// Appends to `channel` and keeps its unread count in step with the log.
    pub fn append_message(
        &mut self,
        channel: &ChannelId,
        role: Role,
        content: String,
    ) -> ChatResult<Message> {
        let message = self.store.append_message(channel, role, content)?;
        let len = self.store.len(channel);
        self.unread.on_append(channel, &self.active, len);
        Ok(message)
    }

    /// Accepts a user submission on `channel`.
    ///
    /// Returns the appended user message and the reply now owed. Blank text and
    /// submissions while a reply is pending are rejected without touching state.
    pub fn submit(
        &mut self,
        channel: &ChannelId,
        text: &str,
    ) -> ChatResult<(Message, PendingReply)> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyInputRejected);
        }
        if self.is_awaiting_reply() {
            return Err(ChatError::ConcurrentSubmitRejected);
        }
        let info = self.store.info(channel)?.clone();

        let message = self.append_message(channel, Role::User, text.to_string())?;
        self.store.clear_draft(channel)?;
        self.phase = ReplyPhase::AwaitingReply {
            channel: channel.clone(),
        };
        self.typing_visible = true;

        Ok((
            message,
            PendingReply {
                channel: info,
                prompt: text.to_string(),
            },
        ))
    }

    /// Delivers the assistant reply for `pending` and reopens the send gate.
    pub fn complete_reply(
        &mut self,
        pending: &PendingReply,
        content: String,
    ) -> ChatResult<Message> {
        match &self.phase {
            ReplyPhase::AwaitingReply { channel } if channel == &pending.channel.id => {}
            _ => return Err(ChatError::NoPendingReply),
        }
        let message = self.append_message(&pending.channel.id, Role::Assistant, content)?;
        self.phase = ReplyPhase::Idle;
        self.typing_visible = false;
        Ok(message)
    }

    /// Gives up on the pending reply without appending anything.
    pub fn fail_reply(&mut self) -> ChatResult<()> {
        if !self.is_awaiting_reply() {
            return Err(ChatError::NoPendingReply);
        }
        self.phase = ReplyPhase::Idle;
        self.typing_visible = false;
        Ok(())
    }

    /// Makes `channel` the active one.
    ///
    /// The typing bubble is hidden on switch but the pending reply, if any,
    /// keeps the send gate closed until it lands.
    pub fn select_channel(&mut self, channel: &ChannelId) -> ChatResult<SelectOutcome> {
        if channel == &self.active {
            return Ok(SelectOutcome::Unchanged);
        }
        self.store.info(channel)?;

        let previous = std::mem::replace(&mut self.active, channel.clone());
        self.typing_visible = false;
        let len = self.store.len(channel);
        self.unread.mark_seen(channel, len);
        Ok(SelectOutcome::Switched { previous })
    }

    /// Starts a new empty "General" conversation in front of the others and
    /// makes it active. Only panels that allow new chats accept this.
    pub fn create_channel(&mut self) -> ChatResult<ChannelId> {
        if !self.allows_new_chats {
            return Err(ChatError::ChannelCreationDisabled);
        }
        let id = loop {
            let candidate = ChannelId::new(format!("chat-{}", self.next_chat));
            self.next_chat += 1;
            if self.store.info(&candidate).is_err() {
                break candidate;
            }
        };
        let info = ChannelInfo::new(id.as_str(), "General", "blue").with_title("New Chat");
        self.store.create_channel(info)?;
        self.unread.mark_seen(&id, 0);
        self.select_channel(&id)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Copilot;

    fn id(s: &str) -> ChannelId {
        ChannelId::new(s)
    }

    fn co_pilot() -> ChatSession {
        ChatSession::from_catalog(Catalog::for_copilot(Copilot::CoPilot)).unwrap()
    }

    fn assert_unread_invariant(session: &ChatSession) {
        for summary in session.channel_summaries() {
            let expected = if summary.active {
                0
            } else {
                session
                    .log_len(&summary.id)
                    .saturating_sub(session.watermark(&summary.id))
            };
            assert_eq!(summary.unread, expected, "channel {}", summary.id);
        }
    }

    #[test]
    fn seeded_session_starts_with_no_unread() {
        let session = co_pilot();
        assert_eq!(session.active_channel(), &id("javascript"));
        assert!(session.channel_summaries().iter().all(|c| c.unread == 0));
        assert_eq!(session.active_messages().len(), 1);
        assert_eq!(session.phase, ReplyPhase::Idle);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let result = ChatSession::new(ChannelMode::PerChannel, Vec::new(), id("react"));
        assert_eq!(result.err(), Some(ChatError::EmptyCatalog));
    }

    #[test]
    fn unread_matches_watermark_formula_after_appends() {
        let mut session = co_pilot();
        session
            .append_message(&id("react"), Role::Assistant, "one".into())
            .unwrap();
        session
            .append_message(&id("java"), Role::Assistant, "two".into())
            .unwrap();
        session
            .append_message(&id("react"), Role::Assistant, "three".into())
            .unwrap();
        session
            .append_message(&id("javascript"), Role::User, "four".into())
            .unwrap();

        assert_eq!(session.unread_count(&id("react")), 2);
        assert_eq!(session.unread_count(&id("java")), 1);
        assert_eq!(session.unread_count(&id("javascript")), 0);
        assert_unread_invariant(&session);
    }

    #[test]
    fn reselecting_active_channel_changes_nothing() {
        let mut session = co_pilot();
        session.set_draft(&id("javascript"), "closures").unwrap();
        let before = session.channel_summaries();

        let outcome = session.select_channel(&id("javascript")).unwrap();

        assert_eq!(outcome, SelectOutcome::Unchanged);
        assert_eq!(session.channel_summaries(), before);
        assert_eq!(session.active_draft(), "closures");
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut session = co_pilot();
        let before = session.active_messages().len();

        for text in ["", "   ", "\n\t"] {
            let err = session.submit(&id("javascript"), text).unwrap_err();
            assert_eq!(err, ChatError::EmptyInputRejected);
            assert!(err.is_silent());
        }

        assert_eq!(session.active_messages().len(), before);
        assert!(!session.is_awaiting_reply());
        assert!(!session.typing_indicator());
    }

    #[test]
    fn submit_while_awaiting_is_rejected() {
        let mut session = co_pilot();
        session.submit(&id("javascript"), "first").unwrap();

        let err = session.submit(&id("javascript"), "second").unwrap_err();
        let other = session.submit(&id("react"), "third").unwrap_err();

        assert_eq!(err, ChatError::ConcurrentSubmitRejected);
        assert_eq!(other, ChatError::ConcurrentSubmitRejected);
        assert_eq!(session.log_len(&id("javascript")), 2);
        assert_eq!(session.log_len(&id("react")), 1);
    }

    #[test]
    fn round_trip_adds_user_then_assistant_message() {
        let mut session = co_pilot();
        let channel = id("javascript");
        session.set_draft(&channel, "what is a closure?").unwrap();

        let (user, pending) = session.submit(&channel, "what is a closure?").unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "what is a closure?");
        assert_eq!(session.active_draft(), "");
        assert!(session.is_awaiting_reply());
        assert_eq!(pending.channel.label, "Adv JavaScript");

        let reply = session.complete_reply(&pending, "answer".into()).unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.id, user.id + 1);
        assert_eq!(session.log_len(&channel), 3);
        assert!(!session.is_awaiting_reply());
        assert!(!session.typing_indicator());
        assert_eq!(session.watermark(&channel), 3);
    }

    #[test]
    fn reply_without_pending_submit_is_an_error() {
        let mut session = co_pilot();
        let pending = PendingReply {
            channel: ChannelInfo::new("javascript", "Adv JavaScript", "green"),
            prompt: "hi".into(),
        };
        let err = session.complete_reply(&pending, "x".into()).unwrap_err();
        assert_eq!(err, ChatError::NoPendingReply);
    }

    #[test]
    fn failed_reply_reopens_the_gate() {
        let mut session = co_pilot();
        session.submit(&id("javascript"), "hello").unwrap();

        session.fail_reply().unwrap();

        assert!(!session.is_awaiting_reply());
        assert_eq!(session.log_len(&id("javascript")), 2);
        assert_eq!(session.fail_reply(), Err(ChatError::NoPendingReply));
        assert!(session.submit(&id("javascript"), "again").is_ok());
    }

    #[test]
    fn reply_to_channel_left_behind_counts_as_unread() {
        let mut session = co_pilot();
        let (_, pending) = session.submit(&id("javascript"), "hello").unwrap();

        session.select_channel(&id("react")).unwrap();
        assert!(!session.typing_indicator());
        assert!(session.is_awaiting_reply());

        session.complete_reply(&pending, "late answer".into()).unwrap();
        assert_eq!(session.unread_count(&id("javascript")), 1);
        assert_unread_invariant(&session);
    }

    #[test]
    fn switching_away_and_back_resets_and_tracks_unread() {
        let mut session = co_pilot();
        let a = id("react");
        let b = id("java");
        for n in 0..3 {
            session
                .append_message(&a, Role::Assistant, format!("a{n}"))
                .unwrap();
        }
        assert_eq!(session.unread_count(&a), 3);

        session.select_channel(&b).unwrap();
        session.select_channel(&a).unwrap();
        assert_eq!(session.unread_count(&a), 0);

        session
            .append_message(&b, Role::Assistant, "b0".into())
            .unwrap();
        assert_eq!(session.unread_count(&b), 1);
        assert_unread_invariant(&session);
    }

    #[test]
    fn drafts_survive_channel_switches() {
        let mut session = co_pilot();
        let a = id("react");
        let b = id("java");

        session.select_channel(&a).unwrap();
        session.set_draft(&a, "useEff").unwrap();
        session.select_channel(&b).unwrap();
        session.set_draft(&b, "interf").unwrap();
        session.select_channel(&a).unwrap();

        assert_eq!(session.active_draft(), "useEff");
        assert_eq!(session.draft(&b), "interf");
    }

    #[test]
    fn unified_session_tags_by_selected_channel() {
        let mut session =
            ChatSession::from_catalog(Catalog::for_copilot(Copilot::CoPilot2)).unwrap();
        session.select_channel(&id("python")).unwrap();

        let (user, pending) = session.submit(&id("python"), "list comprehension?").unwrap();
        let reply = session.complete_reply(&pending, "answer".into()).unwrap();

        assert_eq!(user.channel_tag, Some(id("python")));
        assert_eq!(reply.channel_tag, Some(id("python")));
        assert_eq!(reply.id, 5);
        assert_eq!(session.active_messages().len(), 5);
        assert_unread_invariant(&session);
    }

    fn conversations() -> ChatSession {
        ChatSession::from_catalog(Catalog::for_copilot(Copilot::Conversations)).unwrap()
    }

    #[test]
    fn new_chat_is_first_empty_and_active() {
        let mut session = conversations();

        let created = session.create_channel().unwrap();

        assert_eq!(session.active_channel(), &created);
        assert!(session.active_messages().is_empty());
        assert_eq!(session.watermark(&created), 0);
        let summaries = session.channel_summaries();
        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[0].id, created);
        assert_eq!(summaries[0].title, "New Chat");
        assert_eq!(summaries[0].label, "General");
        assert!(summaries[0].active);
        assert!(summaries.iter().filter(|c| c.active).count() == 1);
        assert_unread_invariant(&session);
    }

    #[test]
    fn new_chat_ids_are_unique() {
        let mut session = conversations();
        let first = session.create_channel().unwrap();
        let second = session.create_channel().unwrap();

        assert_ne!(first, second);
        assert_eq!(session.channel_summaries()[0].id, second);
        assert_eq!(session.log_len(&first), 0);
    }

    #[test]
    fn new_chat_keeps_unread_and_drafts_isolated() {
        let mut session = conversations();
        session.set_draft(&id("chat-1"), "useMemo").unwrap();
        let created = session.create_channel().unwrap();
        session.set_draft(&created, "hello").unwrap();

        session
            .append_message(&created, Role::Assistant, "hi".into())
            .unwrap();
        assert_eq!(session.unread_count(&created), 0);

        session.select_channel(&id("chat-2")).unwrap();
        session
            .append_message(&created, Role::Assistant, "later".into())
            .unwrap();
        session
            .append_message(&created, Role::Assistant, "later still".into())
            .unwrap();

        assert_eq!(session.unread_count(&created), 2);
        assert_eq!(session.draft(&created), "hello");
        assert_eq!(session.draft(&id("chat-1")), "useMemo");
        assert_unread_invariant(&session);
    }

    #[test]
    fn reply_to_new_chat_uses_general_label() {
        let mut session = conversations();
        let created = session.create_channel().unwrap();

        let (user, pending) = session.submit(&created, "where do I start?").unwrap();
        let reply = session.complete_reply(&pending, "answer".into()).unwrap();

        assert_eq!(pending.channel.label, "General");
        assert_eq!((user.id, reply.id), (1, 2));
        let summary = &session.channel_summaries()[0];
        assert_eq!(summary.updated_at, reply.timestamp);
    }

    #[test]
    fn new_chat_outside_conversations_is_refused() {
        let mut session = co_pilot();
        assert_eq!(session.create_channel(), Err(ChatError::ChannelCreationDisabled));
        assert_eq!(session.channel_summaries().len(), 3);
    }
}
