pub mod catalog;
pub mod domain;
pub mod error;
pub mod panel;
pub mod ports;
pub mod session;
pub mod store;
pub mod unread;

pub use catalog::{Catalog, SeedMessage};
pub use domain::{
    ChannelId, ChannelInfo, ChannelMode, ChannelSummary, Copilot, Message, Role, UserProfile,
};
pub use error::{ChatError, ChatResult};
pub use panel::choose_copilot;
pub use ports::{
    KeyValueStore, NoopPanelCallbacks, PanelCallbacks, PortError, PortResult, ReplyComposer,
    SessionIdentityProvider,
};
pub use session::{ChatSession, PendingReply, SelectOutcome};
