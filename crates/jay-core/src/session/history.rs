//! Append-only conversation history.

use super::message::{ConversationMessage, MessageRole};
use serde::Serialize;

/// Ordered log of the messages exchanged in one session.
///
/// The first message is always the persona instruction. Messages are only
/// ever appended: there is no removal, reordering or editing, so the length
/// grows monotonically for the lifetime of the session. Capacity is
/// unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationHistory {
    messages: Vec<ConversationMessage>,
}

impl ConversationHistory {
    /// Starts a history whose first entry is the given persona instruction.
    pub fn with_persona(instruction: impl Into<String>) -> Self {
        Self {
            messages: vec![ConversationMessage::system(instruction)],
        }
    }

    /// Appends a message at the end of the history.
    pub fn append(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    /// Returns the ordered, read-only view of the history.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationMessage> {
        self.messages.iter()
    }

    /// The persona instruction that opened the session.
    pub fn persona_message(&self) -> &ConversationMessage {
        // `with_persona` is the only constructor and nothing removes entries.
        &self.messages[0]
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: a history holds at least the persona instruction.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages with the given role.
    pub fn count_role(&self, role: MessageRole) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a ConversationMessage;
    type IntoIter = std::slice::Iter<'a, ConversationMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
