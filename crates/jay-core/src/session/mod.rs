//! Session domain module.
//!
//! This module contains the conversation state of a chat session.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ConversationMessage`)
//! - `history`: Append-only message log (`ConversationHistory`)
//! - `context`: Facts captured from user input (`SessionContext`)
//! - `model`: The session aggregate (`Session`)
//!
//! # Usage
//!
//! ```ignore
//! use jay_core::session::{Session, ConversationHistory, SessionContext};
//! use jay_core::session::{MessageRole, ConversationMessage};
//! ```

mod context;
mod history;
mod message;
mod model;

// Re-export public API
pub use context::{SessionContext, find_stated_name, name_announcement};
pub use history::ConversationHistory;
pub use message::{ConversationMessage, MessageRole};
pub use model::Session;
