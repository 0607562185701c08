//! Input handling for a chat session.

use crate::completion_client::{CompletionClient, Reply};
use jay_core::config::OverlapPolicy;
use jay_core::session::{ConversationHistory, Session};
use jay_core::transcript::{Sender, TranscriptRenderer};
use jay_core::{JayError, Result};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Result of handling one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionResult {
    /// Blank input; nothing was recorded or rendered.
    Ignored,
    /// The submission was recorded and answered.
    Replied(Reply),
}

/// Turns user submissions into recorded and rendered turns.
///
/// The `ChatController` handles:
/// - Capturing the user's name from their first introduction
/// - Appending user and assistant messages to the session history
/// - Driving the renderer for both turns
/// - Admitting one submission at a time according to the `OverlapPolicy`
pub struct ChatController {
    session: Arc<RwLock<Session>>,
    client: Arc<CompletionClient>,
    renderer: Arc<dyn TranscriptRenderer>,
    overlap: OverlapPolicy,
    /// Held for the whole of a submission. Tokio's mutex is FIFO, so queued
    /// submissions are answered in arrival order.
    submission_slot: Mutex<()>,
}

impl ChatController {
    pub fn new(
        session: Session,
        client: Arc<CompletionClient>,
        renderer: Arc<dyn TranscriptRenderer>,
        overlap: OverlapPolicy,
    ) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            client,
            renderer,
            overlap,
            submission_slot: Mutex::new(()),
        }
    }

    /// Handles one submitted input line.
    ///
    /// # Errors
    ///
    /// Returns `JayError::SubmissionInFlight` under `OverlapPolicy::Reject`
    /// when another submission is still awaiting its reply. Request failures
    /// are not errors; they come back as fallback replies.
    pub async fn submit(&self, input: &str) -> Result<InteractionResult> {
        if input.trim().is_empty() {
            return Ok(InteractionResult::Ignored);
        }

        let _slot = match self.overlap {
            OverlapPolicy::Queue => self.submission_slot.lock().await,
            OverlapPolicy::Reject => self
                .submission_slot
                .try_lock()
                .map_err(|_| JayError::SubmissionInFlight)?,
        };

        // Record the turn, then release the session before the network wait.
        let history = {
            let mut session = self.session.write().await;
            if let Some(name) = session.record_user_message(input) {
                tracing::info!(session_id = %session.id, user_name = %name, "Captured user name");
            }
            session.history().messages().to_vec()
        };

        self.renderer.render_turn(Sender::User, input);
        self.renderer.show_latest_question(input);
        self.renderer.clear_input();

        let reply = self.client.get_reply(&history, input).await;

        self.session.write().await.record_assistant_message(&reply.text);
        self.renderer.render_turn(Sender::Assistant, &reply.text);

        Ok(InteractionResult::Replied(reply))
    }

    pub async fn session_id(&self) -> String {
        self.session.read().await.id.clone()
    }

    /// Copy of the conversation so far.
    pub async fn history(&self) -> ConversationHistory {
        self.session.read().await.history().clone()
    }

    pub async fn user_name(&self) -> Option<String> {
        self.session
            .read()
            .await
            .context()
            .user_name()
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion_client::ReplyOutcome;
    use crate::test_support::MockTransport;
    use jay_core::classifier::KeywordClassifier;
    use jay_core::config::{DEFAULT_REFUSAL, ReplyTexts};
    use jay_core::persona::Persona;
    use jay_core::session::MessageRole;
    use jay_core::transcript::Transcript;
    use std::time::Duration;

    fn controller(
        transport: Arc<MockTransport>,
        overlap: OverlapPolicy,
    ) -> (Arc<ChatController>, Arc<Transcript>) {
        let client = CompletionClient::new(
            transport,
            Arc::new(KeywordClassifier::default()),
            "gpt-4o",
            ReplyTexts::default(),
        );
        let transcript = Arc::new(Transcript::new());
        let controller = ChatController::new(
            Session::new(&Persona::default()),
            Arc::new(client),
            transcript.clone(),
            overlap,
        );
        (Arc::new(controller), transcript)
    }

    async fn wait_for_calls(transport: &MockTransport, n: usize) {
        while transport.call_count() < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn test_submission_appends_one_user_and_one_assistant_message() {
        let transport = Arc::new(MockTransport::echo());
        let (controller, transcript) = controller(transport, OverlapPolicy::Queue);

        let result = controller.submit("Any skincare tips?").await.unwrap();

        let InteractionResult::Replied(reply) = result else {
            panic!("Expected a reply");
        };
        assert_eq!(reply.outcome, ReplyOutcome::Answered);
        assert_eq!(reply.text, "reply to Any skincare tips?");

        let history = controller.history().await;
        assert_eq!(history.len(), 3);
        assert_eq!(history.count_role(MessageRole::User), 1);
        assert_eq!(history.count_role(MessageRole::Assistant), 1);
        assert_eq!(history.messages()[2].content, reply.text);

        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sender, Sender::User);
        assert_eq!(entries[0].text, "Any skincare tips?");
        assert_eq!(entries[1].sender, Sender::Assistant);
        assert_eq!(
            transcript.latest_question().as_deref(),
            Some("You asked: Any skincare tips?")
        );
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let transport = Arc::new(MockTransport::echo());
        let (controller, transcript) = controller(transport.clone(), OverlapPolicy::Queue);

        assert_eq!(controller.submit("   ").await.unwrap(), InteractionResult::Ignored);
        assert_eq!(controller.submit("").await.unwrap(), InteractionResult::Ignored);

        assert_eq!(controller.history().await.len(), 1);
        assert!(transcript.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_off_topic_submission_is_still_recorded() {
        let transport = Arc::new(MockTransport::echo());
        let (controller, transcript) = controller(transport.clone(), OverlapPolicy::Queue);

        controller.submit("What's the capital of France?").await.unwrap();

        let history = controller.history().await;
        assert_eq!(history.len(), 3);
        assert_eq!(history.last().unwrap().content, DEFAULT_REFUSAL);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_name_capture_first_match_wins() {
        let transport = Arc::new(MockTransport::echo());
        let (controller, _) = controller(transport.clone(), OverlapPolicy::Queue);

        controller.submit("Hi, my name is Alice").await.unwrap();
        controller.submit("my name is Bob, recommend a cream").await.unwrap();

        assert_eq!(controller.user_name().await.as_deref(), Some("Alice"));

        let history = controller.history().await;
        let announcements: Vec<&str> = history
            .iter()
            .skip(1)
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(announcements, vec!["The user's name is Alice."]);

        // Only the second message is in-domain; it carries the announcement.
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(
            requests[0]
                .messages
                .iter()
                .any(|m| m.content == "The user's name is Alice.")
        );
    }

    #[tokio::test]
    async fn test_persona_stays_first() {
        let transport = Arc::new(MockTransport::echo());
        let (controller, _) = controller(transport, OverlapPolicy::Queue);
        let before = controller.history().await.persona_message().clone();

        for text in ["my name is Dana", "lipstick?", "weather?", "hair routine"] {
            controller.submit(text).await.unwrap();
        }

        let history = controller.history().await;
        assert_eq!(history.persona_message(), &before);
        assert_eq!(history.len(), 1 + 1 + 4 * 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reject_policy_turns_away_overlapping_submission() {
        let transport = Arc::new(MockTransport::gated_echo());
        let (controller, transcript) = controller(transport.clone(), OverlapPolicy::Reject);

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("lipstick for me?").await })
        };
        wait_for_calls(&transport, 1).await;

        let err = controller.submit("and mascara?").await.unwrap_err();
        assert!(err.is_in_flight());

        transport.release(1);
        first.await.unwrap().unwrap();

        let history = controller.history().await;
        assert_eq!(history.len(), 3);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_queue_policy_answers_in_submission_order() {
        let transport = Arc::new(MockTransport::gated_echo());
        let (controller, transcript) = controller(transport.clone(), OverlapPolicy::Queue);

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("first serum question").await })
        };
        wait_for_calls(&transport, 1).await;

        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("second serum question").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The second submission waits for the slot before touching the session.
        assert_eq!(controller.history().await.len(), 2);
        assert_eq!(transport.call_count(), 1);

        transport.release(2);
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let contents: Vec<String> = controller
            .history()
            .await
            .iter()
            .skip(1)
            .map(|m| m.content.clone())
            .collect();
        assert_eq!(
            contents,
            vec![
                "first serum question",
                "reply to first serum question",
                "second serum question",
                "reply to second serum question",
            ]
        );
        assert_eq!(transcript.len(), 4);
    }
}
