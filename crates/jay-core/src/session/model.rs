//! Session domain model.

use super::context::{SessionContext, name_announcement};
use super::history::ConversationHistory;
use super::message::ConversationMessage;
use crate::persona::Persona;
use serde::Serialize;

/// All mutable state of one chat session.
///
/// A session owns its history and context outright; nothing is shared
/// between sessions and nothing outlives the process.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Timestamp when the session was created (RFC 3339 format)
    pub created_at: String,
    history: ConversationHistory,
    context: SessionContext,
}

impl Session {
    /// Starts a session whose history opens with the persona instruction.
    pub fn new(persona: &Persona) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            history: ConversationHistory::with_persona(persona.instruction.clone()),
            context: SessionContext::new(),
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Records a user submission.
    ///
    /// When the text carries the session's first name introduction, a system
    /// message announcing the name is appended before the user message.
    /// Returns the newly captured name, if any.
    pub fn record_user_message(&mut self, text: &str) -> Option<String> {
        let captured = self.context.capture_name(text).map(str::to_string);
        if let Some(name) = &captured {
            self.history
                .append(ConversationMessage::system(name_announcement(name)));
        }
        self.history.append(ConversationMessage::user(text));
        captured
    }

    pub fn record_assistant_message(&mut self, text: &str) {
        self.history.append(ConversationMessage::assistant(text));
    }
}
