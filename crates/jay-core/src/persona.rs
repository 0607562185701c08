//! Persona definition used to open every conversation.

use serde::{Deserialize, Serialize};

/// Display name of the built-in assistant.
pub const DEFAULT_PERSONA_NAME: &str = "Jay";

/// System instruction of the built-in assistant.
pub const DEFAULT_PERSONA_INSTRUCTION: &str = "You are Jay the energetic AI chatbot for L’Oréal Paris. Your sole task is to answer questions about L’Oréal Paris products, routines, and beauty tips. Use short, peppy replies in Markdown:
- Product names in **bold**
- Lists for multi-step routines
- Emojis to add warmth

Begin each conversation with a friendly greeting (e.g. “Hello!  I’m your L’Oréal Paris beauty buddy!”) and end with a light sign-off (e.g. “Happy pampering! 💖”).

If a user asks anything not related to L’Oréal Paris, politely say:
> “Sorry, I can only help with L’Oréal Paris products and routines! 😊”

Always keep responses concise to maintain engagement.";

/// The assistant's identity: a display name and the system instruction that
/// becomes the first message of every session.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    pub instruction: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA_NAME, DEFAULT_PERSONA_INSTRUCTION)
    }
}
