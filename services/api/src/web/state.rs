//! services/api/src/web/state.rs
//!
//! Defines the application's shared and panel-specific states.

use crate::config::Config;
use crate::web::protocol::{ChatView, ServerMessage};
use course_chat_core::{
    catalog::Catalog,
    domain::{Copilot, UserProfile},
    error::ChatResult,
    ports::{KeyValueStore, ReplyComposer, SessionIdentityProvider},
    session::ChatSession,
};
use std::sync::Arc;
use tokio::sync::mpsc::{error::TrySendError, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How many server messages may wait for a slow client before new ones are dropped.
pub const OUTBOX_CAPACITY: usize = 256;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn KeyValueStore>,
    pub identity: Arc<dyn SessionIdentityProvider>,
    pub reply_composer: Arc<dyn ReplyComposer>,
}

/// The signed-in user resolved by the auth middleware, if the profile is readable.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Option<UserProfile>);

//=========================================================================================
// PanelState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state of one mounted chat panel.
pub struct PanelState {
    pub user: Option<UserProfile>,
    pub copilot: Copilot,
    pub is_open: bool,
    pub chat: ChatSession,
    /// Cancelled when this mount is torn down; timers spawned for it stop.
    pub cancellation_token: CancellationToken,
    outbox: Sender<ServerMessage>,
}

impl PanelState {
    /// Mounts a freshly seeded session for `copilot`.
    pub fn mount(
        copilot: Copilot,
        is_open: bool,
        user: Option<UserProfile>,
        outbox: Sender<ServerMessage>,
    ) -> ChatResult<Self> {
        Ok(Self {
            user,
            copilot,
            is_open,
            chat: ChatSession::from_catalog(Catalog::for_copilot(copilot))?,
            cancellation_token: CancellationToken::new(),
            outbox,
        })
    }

    /// Queues a render update. Nothing is shown while the panel is closed.
    pub fn emit(&self, msg: ServerMessage) {
        if self.is_open {
            self.send(msg);
        }
    }

    /// Queues a message regardless of visibility. Never waits on the client.
    pub fn send(&self, msg: ServerMessage) {
        match self.outbox.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Outbox full, dropping server message for a slow client.");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Outbox closed, dropping server message.");
            }
        }
    }

    pub fn view(&self) -> ChatView {
        ChatView {
            copilot: self.copilot,
            mode: self.chat.mode(),
            user: self.user.clone(),
            channels: self.chat.channel_summaries(),
            active_channel: self.chat.active_channel().clone(),
            messages: self.chat.active_messages(),
            typing: self.chat.typing_indicator(),
            draft: self.chat.active_draft().to_string(),
        }
    }

    /// Takes the outbox over into a fresh mount for another copilot.
    pub fn remount(&self, copilot: Copilot) -> ChatResult<Self> {
        Self::mount(copilot, self.is_open, self.user.clone(), self.outbox.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn full_outbox_drops_instead_of_growing() {
        let (outbox, mut rx) = mpsc::channel(1);
        let panel = PanelState::mount(Copilot::CoPilot, true, None, outbox).unwrap();

        panel.send(ServerMessage::PanelOpened);
        panel.send(ServerMessage::PanelClosed);

        assert_eq!(rx.try_recv().unwrap(), ServerMessage::PanelOpened);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_panel_only_sends_unconditional_messages() {
        let (outbox, mut rx) = mpsc::channel(OUTBOX_CAPACITY);
        let panel = PanelState::mount(Copilot::CoPilot, false, None, outbox).unwrap();

        panel.emit(ServerMessage::TypingChanged { typing: true });
        panel.send(ServerMessage::PanelClosed);

        assert_eq!(rx.try_recv().unwrap(), ServerMessage::PanelClosed);
        assert!(rx.try_recv().is_err());
    }
}
