//! services/api/src/web/controller.rs
//!
//! Drives one mounted chat panel: applies client intents to the session,
//! spawns the reply and focus timers, and tears everything down on unmount.

use crate::error::ApiError;
use crate::web::{
    focus_task::focus_process,
    protocol::ServerMessage,
    reply_task::reply_process,
    state::{AppState, PanelState},
};
use course_chat_core::{
    domain::{ChannelId, Copilot, UserProfile},
    error::{ChatError, ChatResult},
    panel::choose_copilot,
    ports::PanelCallbacks,
    session::SelectOutcome,
};
use std::sync::Arc;
use tokio::{
    sync::{mpsc::Sender, Mutex},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

pub struct ChatController {
    app_state: Arc<AppState>,
    panel_lock: Arc<Mutex<PanelState>>,
    reply_task_handle: Option<JoinHandle<()>>,
    focus_task_handle: Option<JoinHandle<()>>,
}

/// Collects what the copilot menu asked for so it can be applied afterwards.
#[derive(Default)]
struct MenuEffects {
    copilot: Option<Copilot>,
    toggle: bool,
}

impl PanelCallbacks for MenuEffects {
    fn on_toggle_chat(&mut self) {
        self.toggle = !self.toggle;
    }

    fn on_copilot_change(&mut self, copilot: Copilot) {
        self.copilot = Some(copilot);
    }
}

impl ChatController {
    /// Mounts a seeded panel and announces it on `outbox`.
    pub async fn mount(
        app_state: Arc<AppState>,
        copilot: Copilot,
        open: bool,
        user: Option<UserProfile>,
        outbox: Sender<ServerMessage>,
    ) -> Result<Self, ApiError> {
        let panel = PanelState::mount(copilot, false, user, outbox)?;
        panel.send(ServerMessage::SessionInitialized {
            copilot,
            mode: panel.chat.mode(),
        });
        info!("Chat panel mounted with {}.", copilot.display_name());

        let mut controller = Self {
            app_state,
            panel_lock: Arc::new(Mutex::new(panel)),
            reply_task_handle: None,
            focus_task_handle: None,
        };
        if open {
            controller.open().await;
        }
        Ok(controller)
    }

    pub fn panel(&self) -> Arc<Mutex<PanelState>> {
        self.panel_lock.clone()
    }

    //=====================================================================================
    // Visibility
    //=====================================================================================

    pub async fn open(&mut self) {
        {
            let mut panel = self.panel_lock.lock().await;
            if panel.is_open {
                return;
            }
            panel.is_open = true;
            panel.send(ServerMessage::PanelOpened);
            let view = panel.view();
            panel.emit(ServerMessage::Snapshot { view });
        }
        self.schedule_focus().await;
    }

    pub async fn close(&mut self) {
        let mut panel = self.panel_lock.lock().await;
        if !panel.is_open {
            return;
        }
        panel.is_open = false;
        if let Some(handle) = self.focus_task_handle.take() {
            handle.abort();
        }
        panel.send(ServerMessage::PanelClosed);
    }

    pub async fn toggle(&mut self) {
        let is_open = self.panel_lock.lock().await.is_open;
        if is_open {
            self.close().await;
        } else {
            self.open().await;
        }
    }

    /// Applies a copilot menu click: switch copilot, then open or close as the menu decides.
    pub async fn choose_copilot(&mut self, chosen: Copilot) {
        let (active, is_open) = {
            let panel = self.panel_lock.lock().await;
            (panel.copilot, panel.is_open)
        };
        let mut effects = MenuEffects::default();
        choose_copilot(active, is_open, chosen, &mut effects);

        if let Some(copilot) = effects.copilot.filter(|c| *c != active) {
            if let Err(e) = self.remount(copilot).await {
                error!("Failed to remount chat panel: {}", e);
                return;
            }
        }
        if effects.toggle {
            self.toggle().await;
        }
    }

    /// Replaces the mounted session with a fresh one for `copilot`.
    async fn remount(&mut self, copilot: Copilot) -> ChatResult<()> {
        self.cancel_timers().await;
        let is_open = {
            let mut panel = self.panel_lock.lock().await;
            let fresh = panel.remount(copilot)?;
            *panel = fresh;
            panel.send(ServerMessage::SessionInitialized {
                copilot,
                mode: panel.chat.mode(),
            });
            let view = panel.view();
            panel.emit(ServerMessage::Snapshot { view });
            panel.is_open
        };
        info!("Chat panel remounted with {}.", copilot.display_name());
        if is_open {
            self.schedule_focus().await;
        }
        Ok(())
    }

    //=====================================================================================
    // Chat Intents
    //=====================================================================================

    pub async fn select_channel(&mut self, channel_id: ChannelId) {
        {
            let mut panel = self.panel_lock.lock().await;
            match panel.chat.select_channel(&channel_id) {
                Ok(SelectOutcome::Unchanged) => return,
                Ok(SelectOutcome::Switched { previous }) => {
                    info!("Switched channel from {} to {}.", previous, channel_id);
                    let view = panel.view();
                    panel.emit(ServerMessage::Snapshot { view });
                }
                Err(e) => {
                    report(&panel, e);
                    return;
                }
            }
        }
        self.schedule_focus().await;
    }

    /// Starts an empty conversation, shows it and moves focus into it.
    pub async fn new_chat(&mut self) {
        {
            let mut panel = self.panel_lock.lock().await;
            match panel.chat.create_channel() {
                Ok(channel_id) => {
                    info!("Started new chat {}.", channel_id);
                    let view = panel.view();
                    panel.emit(ServerMessage::Snapshot { view });
                }
                Err(e) => {
                    report(&panel, e);
                    return;
                }
            }
        }
        self.schedule_focus().await;
    }

    pub async fn set_draft(&mut self, channel_id: ChannelId, text: String) {
        let mut panel = self.panel_lock.lock().await;
        match panel.chat.set_draft(&channel_id, &text) {
            Ok(()) => panel.emit(ServerMessage::DraftChanged { channel_id, text }),
            Err(e) => report(&panel, e),
        }
    }

    /// Sends `text` on the active channel and starts the simulated reply.
    pub async fn submit(&mut self, text: String) {
        let mut panel = self.panel_lock.lock().await;
        let channel_id = panel.chat.active_channel().clone();

        let (message, pending) = match panel.chat.submit(&channel_id, &text) {
            Ok(accepted) => accepted,
            Err(e) => {
                report(&panel, e);
                return;
            }
        };

        panel.emit(ServerMessage::MessageAppended {
            channel_id: channel_id.clone(),
            message,
        });
        panel.emit(ServerMessage::DraftChanged {
            channel_id,
            text: String::new(),
        });
        panel.emit(ServerMessage::TypingChanged { typing: true });

        let task = {
            let app_state = self.app_state.clone();
            let panel_lock = self.panel_lock.clone();
            let token = panel.cancellation_token.clone();
            tokio::spawn(async move {
                if let Err(e) = reply_process(app_state, panel_lock, pending, token).await {
                    error!("Reply process failed: {:?}", e);
                }
            })
        };
        self.reply_task_handle = Some(task);
    }

    //=====================================================================================
    // Timers and Teardown
    //=====================================================================================

    async fn schedule_focus(&mut self) {
        let token = {
            let panel = self.panel_lock.lock().await;
            if !panel.is_open {
                return;
            }
            panel.cancellation_token.clone()
        };
        if let Some(handle) = self.focus_task_handle.take() {
            handle.abort();
        }
        let task = tokio::spawn(focus_process(
            self.panel_lock.clone(),
            self.app_state.config.focus_delay,
            token,
        ));
        self.focus_task_handle = Some(task);
    }

    async fn cancel_timers(&mut self) {
        self.panel_lock.lock().await.cancellation_token.cancel();
        if let Some(handle) = self.reply_task_handle.take() {
            handle.abort();
        }
        if let Some(handle) = self.focus_task_handle.take() {
            handle.abort();
        }
    }

    /// Unmounts the panel. Pending replies and focus requests never fire.
    pub async fn teardown(&mut self) {
        self.cancel_timers().await;
        info!("Chat panel torn down.");
    }
}

/// Silent rejections are only logged; anything else is shown to the client.
fn report(panel: &PanelState, e: ChatError) {
    if e.is_silent() {
        debug!("Ignoring chat intent: {}", e);
    } else {
        warn!("Chat intent failed: {}", e);
        panel.emit(ServerMessage::Error {
            message: e.to_string(),
        });
    }
}
