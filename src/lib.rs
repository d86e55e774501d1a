pub mod app;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod handler;
pub mod logging;
pub mod state;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use client::{AnalysisReply, ChatClient, decode_envelope};
pub use config::Config;
pub use controller::ChatController;
pub use error::ChatError;
pub use state::{ConversationView, Entry, EntryKind, Focus, PendingState};
