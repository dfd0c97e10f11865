//! services/api/src/web/focus_task.rs
//!
//! Deferred input focus, sent once layout has had a moment to settle.

use crate::web::{protocol::ServerMessage, state::PanelState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub async fn focus_process(
    panel_lock: Arc<Mutex<PanelState>>,
    delay: Duration,
    cancellation_token: CancellationToken,
) {
    tokio::select! {
        _ = cancellation_token.cancelled() => return,
        _ = tokio::time::sleep(delay) => {}
    }

    let panel = panel_lock.lock().await;
    if cancellation_token.is_cancelled() {
        return;
    }
    // A closed panel has nothing to focus.
    panel.emit(ServerMessage::FocusInput {
        channel_id: panel.chat.active_channel().clone(),
    });
}
