//! Visible transcript of a chat session.
//!
//! The transcript is a display-only projection of the conversation: it holds
//! what was shown, in the order it was shown, and nothing else.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use strum::{AsRefStr, Display};

/// Who a rendered turn came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    #[strum(serialize = "ai")]
    #[serde(rename = "ai")]
    Assistant,
}

/// One rendered turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub sender: Sender,
    pub text: String,
}

/// Text shown above the transcript for the most recent submission.
pub fn latest_question_label(text: &str) -> String {
    format!("You asked: {text}")
}

/// Display surface for a chat session.
///
/// Implementations only present what they are given. Entries are appended
/// at the end and never removed or edited; text is shown literally.
pub trait TranscriptRenderer: Send + Sync {
    /// Appends a turn to the end of the transcript and brings it into view.
    fn render_turn(&self, sender: Sender, text: &str);

    /// Replaces the "latest question" display with the submitted text.
    fn show_latest_question(&self, text: &str);

    /// Clears the input field after a submission has been taken.
    fn clear_input(&self) {}
}

/// In-memory transcript.
///
/// Serves both as the display list behind terminal output and as a renderer
/// on its own for headless sessions.
///
/// A renderer that panicked mid-call leaves the locks poisoned; the data is
/// still consistent (every mutation is a single push or assignment), so the
/// guards are recovered instead of dropping later turns.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Mutex<Vec<TranscriptEntry>>,
    latest_question: Mutex<Option<String>>,
}

fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries in render order.
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        lock_recovering(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        lock_recovering(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current "latest question" label, if anything was submitted yet.
    pub fn latest_question(&self) -> Option<String> {
        lock_recovering(&self.latest_question).clone()
    }
}

impl TranscriptRenderer for Transcript {
    fn render_turn(&self, sender: Sender, text: &str) {
        lock_recovering(&self.entries).push(TranscriptEntry {
            sender,
            text: text.to_string(),
        });
    }

    fn show_latest_question(&self, text: &str) {
        *lock_recovering(&self.latest_question) = Some(latest_question_label(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_appends_one_entry_at_end() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());

        transcript.render_turn(Sender::User, "hi");
        assert_eq!(transcript.len(), 1);
        transcript.render_turn(Sender::Assistant, "**Rouge**");
        assert_eq!(transcript.len(), 2);

        let entries = transcript.entries();
        assert_eq!(entries[0].sender, Sender::User);
        assert_eq!(entries[1].sender, Sender::Assistant);
        assert_eq!(entries[1].text, "**Rouge**");
    }

    #[test]
    fn test_latest_question_is_replaced() {
        let transcript = Transcript::new();
        assert_eq!(transcript.latest_question(), None);
        transcript.show_latest_question("first");
        transcript.show_latest_question("second");
        assert_eq!(transcript.latest_question().as_deref(), Some("You asked: second"));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_render_after_poisoned_lock_still_appends() {
        let transcript = Transcript::new();
        transcript.render_turn(Sender::User, "before");

        std::thread::scope(|scope| {
            let result = scope
                .spawn(|| {
                    let _guard = transcript.entries.lock().unwrap();
                    panic!("renderer crashed while holding the transcript");
                })
                .join();
            assert!(result.is_err());
        });
        assert!(transcript.entries.is_poisoned());

        transcript.render_turn(Sender::Assistant, "after");
        transcript.show_latest_question("after");

        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].sender, Sender::Assistant);
        assert_eq!(entries[1].text, "after");
        assert_eq!(transcript.latest_question().as_deref(), Some("You asked: after"));
    }

    #[test]
    fn test_sender_tags() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Assistant.as_ref(), "ai");
    }
}
