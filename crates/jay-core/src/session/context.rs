//! Facts about the user gathered while the session runs.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static NAME_INTRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)my name is (\w+)").expect("valid name pattern"));

/// Extracts the name from a "my name is <word>" introduction, if present.
///
/// `<word>` is a run of Unicode word characters, so accented names are
/// captured whole.
pub fn find_stated_name(text: &str) -> Option<&str> {
    NAME_INTRO_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Text of the system message that tells the model the user's name.
pub fn name_announcement(name: &str) -> String {
    format!("The user's name is {name}.")
}

/// Per-session context injected into the conversation as system messages.
///
/// The user's name is captured at most once: the first introduction wins and
/// later ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    user_name: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn has_user_name(&self) -> bool {
        self.user_name.is_some()
    }

    /// Captures the user's name from `text` if none is known yet.
    ///
    /// Returns the newly captured name, or `None` when a name was already
    /// captured or `text` contains no introduction.
    pub fn capture_name(&mut self, text: &str) -> Option<&str> {
        if self.user_name.is_some() {
            return None;
        }
        let name = find_stated_name(text)?;
        self.user_name = Some(name.to_string());
        self.user_name.as_deref()
    }
}
