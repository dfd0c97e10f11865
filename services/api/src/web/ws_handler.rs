//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each connection mounts one chat panel; closing the socket unmounts it.

use crate::error::ApiError;
use crate::web::{
    controller::ChatController,
    protocol::{ClientMessage, ServerMessage},
    state::{AppState, CurrentUser, OUTBOX_CAPACITY},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    Extension,
};
use futures::{stream::SplitSink, stream::StreamExt, SinkExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, current_user))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, current_user: CurrentUser) {
    info!("New WebSocket connection established.");

    let (mut sender, mut receiver) = socket.split();

    // --- 1. Initialization Phase ---
    let (copilot, open) = if let Some(Ok(Message::Text(init_json))) = receiver.next().await {
        match serde_json::from_str::<ClientMessage>(init_json.as_str()) {
            Ok(ClientMessage::Init { copilot, open }) => (copilot, open),
            _ => {
                error!("First message was not a valid Init message.");
                return;
            }
        }
    } else {
        error!("Client disconnected before sending Init message.");
        return;
    };

    // Everything the panel emits goes through one queue so that timers and
    // handlers never contend for the socket sink.
    let (outbox, outbox_rx) = mpsc::channel::<ServerMessage>(OUTBOX_CAPACITY);
    let forward_task = tokio::spawn(async move {
        if let Err(e) = forward_outbox(&mut sender, outbox_rx).await {
            warn!("Stopped forwarding server messages: {}", e);
        }
    });

    let mut controller =
        match ChatController::mount(app_state, copilot, open, current_user.0, outbox).await {
            Ok(controller) => controller,
            Err(e) => {
                error!("Failed to mount chat panel: {}", e);
                forward_task.abort();
                return;
            }
        };

    // --- 2. Main Message Loop ---
    loop {
        if let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    handle_text_message(text.as_str(), &mut controller).await;
                }
                Message::Close(_) => {
                    info!("Client sent close message.");
                    break;
                }
                _ => {}
            }
        } else {
            info!("Client disconnected.");
            break;
        }
    }

    // --- 3. Cleanup ---
    controller.teardown().await;
    forward_task.abort();
    info!("WebSocket connection closed.");
}

/// Writes queued server messages to the socket until the queue closes or a send fails.
async fn forward_outbox(
    sender: &mut SplitSink<WebSocket, Message>,
    mut outbox_rx: mpsc::Receiver<ServerMessage>,
) -> Result<(), ApiError> {
    while let Some(msg) = outbox_rx.recv().await {
        let json = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize server message: {}", e);
                continue;
            }
        };
        sender.send(Message::Text(json.into())).await?;
    }
    Ok(())
}

/// Helper function to route each `ClientMessage` variant to the controller.
async fn handle_text_message(text: &str, controller: &mut ChatController) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(client_msg) => match client_msg {
            ClientMessage::OpenPanel => controller.open().await,
            ClientMessage::ClosePanel => controller.close().await,
            ClientMessage::TogglePanel => controller.toggle().await,
            ClientMessage::ChooseCopilot { copilot } => controller.choose_copilot(copilot).await,
            ClientMessage::SelectChannel { channel_id } => {
                controller.select_channel(channel_id).await
            }
            ClientMessage::SetDraft { channel_id, text } => {
                controller.set_draft(channel_id, text).await
            }
            ClientMessage::Submit { text } => controller.submit(text).await,
            ClientMessage::NewChat => controller.new_chat().await,
            ClientMessage::Init { .. } => {
                warn!("Received subsequent Init message, which is ignored.");
            }
        },
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
        }
    }
}
