//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the dashboard's chat panel
//! and the API server.

use course_chat_core::domain::{
    ChannelId, ChannelMode, ChannelSummary, Copilot, Message, UserProfile,
};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Mounts the chat panel. This must be the first message sent on the connection.
    Init {
        #[serde(default)]
        copilot: Copilot,
        #[serde(default)]
        open: bool,
    },

    OpenPanel,

    ClosePanel,

    /// The close button or the navbar chat icon.
    TogglePanel,

    /// A click on one of the copilot entries of the dashboard menu.
    ChooseCopilot { copilot: Copilot },

    SelectChannel { channel_id: ChannelId },

    /// Keystrokes in a channel's input box.
    SetDraft { channel_id: ChannelId, text: String },

    /// Sends `text` on the active channel.
    Submit { text: String },

    /// Starts an empty conversation and switches to it. Only the full-page
    /// assistant accepts this.
    NewChat,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Everything the panel needs to render from scratch.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatView {
    pub copilot: Copilot,
    pub mode: ChannelMode,
    pub user: Option<UserProfile>,
    pub channels: Vec<ChannelSummary>,
    pub active_channel: ChannelId,
    pub messages: Vec<Message>,
    pub typing: bool,
    pub draft: String,
}

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirms the panel was mounted.
    SessionInitialized { copilot: Copilot, mode: ChannelMode },

    /// Full render state, sent whenever the panel opens, the active channel
    /// changes or a conversation is created.
    Snapshot { view: ChatView },

    MessageAppended { channel_id: ChannelId, message: Message },

    /// Shows or hides the "assistant is typing" bubble.
    TypingChanged { typing: bool },

    /// Fresh tab list with unread badges.
    ChannelsUpdated { channels: Vec<ChannelSummary> },

    DraftChanged { channel_id: ChannelId, text: String },

    /// The client should move keyboard focus into the input box.
    FocusInput { channel_id: ChannelId },

    PanelOpened,

    PanelClosed,

    /// Reports an error to the client, which should display an error message.
    Error { message: String },
}
