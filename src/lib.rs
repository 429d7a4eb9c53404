// src/lib.rs

pub mod api;
pub mod config;
pub mod constants;
pub mod conversations;
pub mod errors;
pub mod models;
pub mod notify;
pub mod scorer;
pub mod session;
pub mod store;

pub use config::Config;
pub use errors::{ColloquyError, ColloquyResult};
pub use models::{Conversation, Message, MessageRole, Role};
pub use session::ChatSession;
