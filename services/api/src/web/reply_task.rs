//! services/api/src/web/reply_task.rs
//!
//! This module contains the asynchronous "worker" function that plays the part
//! of a backend: it waits out the simulated latency and delivers one reply.

use crate::error::ApiError;
use crate::web::{protocol::ServerMessage, state::{AppState, PanelState}};
use course_chat_core::session::PendingReply;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Delivers the assistant reply for `pending` after the configured delay.
///
/// Tearing the panel down cancels `cancellation_token`; the token is checked
/// again once the panel lock is held, so a discarded session is never touched.
pub async fn reply_process(
    app_state: Arc<AppState>,
    panel_lock: Arc<Mutex<PanelState>>,
    pending: PendingReply,
    cancellation_token: CancellationToken,
) -> Result<(), ApiError> {
    info!("Reply simulation started for channel {}.", pending.channel.id);

    tokio::select! {
        _ = cancellation_token.cancelled() => {
            info!("Reply simulation cancelled before delivery.");
            return Ok(());
        }
        _ = tokio::time::sleep(app_state.config.reply_delay) => {}
    }

    let composed = app_state
        .reply_composer
        .compose_reply(&pending.prompt, &pending.channel)
        .await;

    let mut panel = panel_lock.lock().await;
    if cancellation_token.is_cancelled() {
        info!("Panel was torn down while composing, dropping reply.");
        return Ok(());
    }

    let content = match composed {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to compose reply: {}", e);
            panel.chat.fail_reply()?;
            panel.emit(ServerMessage::TypingChanged { typing: false });
            panel.emit(ServerMessage::Error {
                message: "The assistant could not answer. Please try again.".to_string(),
            });
            return Err(e.into());
        }
    };

    let message = panel.chat.complete_reply(&pending, content)?;
    info!("Reply delivered to channel {}.", pending.channel.id);

    let typing = panel.chat.typing_indicator();
    let channels = panel.chat.channel_summaries();
    panel.emit(ServerMessage::MessageAppended {
        channel_id: pending.channel.id.clone(),
        message,
    });
    panel.emit(ServerMessage::TypingChanged { typing });
    panel.emit(ServerMessage::ChannelsUpdated { channels });

    Ok(())
}
