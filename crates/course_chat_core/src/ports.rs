//! crates/course_chat_core/src/ports.rs
//!
//! Defines the service contracts (traits) the chat core depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to stay independent of browser-style storage, reply backends and UI shells.

use async_trait::async_trait;
use crate::domain::{ChannelInfo, Copilot, UserProfile};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A flat string key-value store, the server-side stand-in for browser local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> PortResult<()>;

    async fn remove(&self, key: &str) -> PortResult<()>;
}

/// Read-only view of who is signed in. The chat core never writes identity.
#[async_trait]
pub trait SessionIdentityProvider: Send + Sync {
    /// Returns the stored profile, or `None` if absent or unreadable.
    async fn current_user(&self) -> PortResult<Option<UserProfile>>;

    async fn access_token(&self) -> PortResult<Option<String>>;
}

#[async_trait]
pub trait ReplyComposer: Send + Sync {
    /// Produces the assistant's answer to `prompt` sent on `channel`.
    async fn compose_reply(&self, prompt: &str, channel: &ChannelInfo) -> PortResult<String>;
}

/// Capabilities the panel asks of its host shell.
///
/// Hosts that do not care about one of them pass [`NoopPanelCallbacks`]
/// or implement the method as an empty body.
pub trait PanelCallbacks {
    fn on_toggle_chat(&mut self);

    fn on_copilot_change(&mut self, copilot: Copilot);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPanelCallbacks;

impl PanelCallbacks for NoopPanelCallbacks {
    fn on_toggle_chat(&mut self) {}

    fn on_copilot_change(&mut self, _copilot: Copilot) {}
}
