pub mod auth;
pub mod controller;
pub mod focus_task;
pub mod middleware;
pub mod protocol;
pub mod reply_task;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the main WebSocket handler to make it easily accessible
// to the binary that will build the web server router.
pub use ws_handler::ws_handler;
pub use rest::{list_channels_handler, me_handler};
pub use middleware::require_auth;
