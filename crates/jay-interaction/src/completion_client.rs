//! CompletionClient - relays the conversation to an OpenAI-compatible
//! chat-completions endpoint and turns whatever comes back into reply text.
//!
//! Requests go to a relay that holds the credentials, so no Authorization
//! header is sent. Every failure is recovered locally: the caller always gets
//! text to show, never an error.

use async_trait::async_trait;
use jay_core::classifier::{KeywordClassifier, TopicClassifier};
use jay_core::config::{AppConfig, ReplyTexts};
use jay_core::session::{ConversationMessage, MessageRole};
use jay_core::{JayError, Result as JayResult};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a completion request produced no reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The request could not be completed or the body was not JSON.
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The body was JSON but did not carry `choices[0].message.content`.
    #[error("Protocol mismatch: {0}")]
    Protocol(String),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<&ConversationMessage> for ChatMessage {
    fn from(message: &ConversationMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Sends one request and returns the parsed JSON body.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<Value, CompletionError>;
}

/// `CompletionTransport` over HTTP with reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Creates a transport posting to `endpoint`. Without a timeout the
    /// request waits until the connection settles or fails.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> JayResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| JayError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Wraps an already configured reqwest client.
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn send(&self, body: &ChatCompletionRequest) -> Result<Value, CompletionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| CompletionError::Transport(format!("Relay request failed: {err}")))?;

        // The body is parsed whatever the status: relays often wrap errors in JSON.
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Relay returned non-success status");
        }

        response.json::<Value>().await.map_err(|err| {
            CompletionError::Transport(format!("Failed to read relay response as JSON: {err}"))
        })
    }
}

/// How a reply was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The model answered.
    Answered,
    /// The message was off-topic; nothing was sent.
    OffTopic,
    /// The relay answered without usable content.
    ProtocolMismatch,
    /// The request failed.
    TransportFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub outcome: ReplyOutcome,
}

/// Topic-gated chat-completions client.
#[derive(Clone)]
pub struct CompletionClient {
    transport: Arc<dyn CompletionTransport>,
    classifier: Arc<dyn TopicClassifier>,
    model: String,
    replies: ReplyTexts,
}

impl CompletionClient {
    pub fn new(
        transport: Arc<dyn CompletionTransport>,
        classifier: Arc<dyn TopicClassifier>,
        model: impl Into<String>,
        replies: ReplyTexts,
    ) -> Self {
        Self {
            transport,
            classifier,
            model: model.into(),
            replies,
        }
    }

    /// Builds an HTTP-backed client with a keyword classifier from `config`.
    pub fn from_config(config: &AppConfig) -> JayResult<Self> {
        let timeout = config.relay.timeout_secs.map(Duration::from_secs);
        let transport = HttpTransport::new(config.relay.endpoint.clone(), timeout)?;
        let classifier = KeywordClassifier::new(&config.topic.keywords);

        Ok(Self::new(
            Arc::new(transport),
            Arc::new(classifier),
            config.relay.model.clone(),
            config.replies.clone(),
        ))
    }

    /// Produces the reply to `latest_user_message` given the full history.
    ///
    /// Off-topic messages are answered with the refusal text without any
    /// request. Failed requests are answered with fallback text; the cause
    /// is logged and never shown.
    pub async fn get_reply(
        &self,
        history: &[ConversationMessage],
        latest_user_message: &str,
    ) -> Reply {
        if !self.classifier.is_in_domain(latest_user_message) {
            tracing::debug!("Message classified off-topic, skipping relay");
            return Reply {
                text: self.replies.refusal.clone(),
                outcome: ReplyOutcome::OffTopic,
            };
        }

        match self.request_completion(history).await {
            Ok(text) => Reply {
                text,
                outcome: ReplyOutcome::Answered,
            },
            Err(CompletionError::Protocol(detail)) => {
                tracing::warn!(%detail, "Relay response had no reply content");
                Reply {
                    text: self.replies.no_response.clone(),
                    outcome: ReplyOutcome::ProtocolMismatch,
                }
            }
            Err(CompletionError::Transport(detail)) => {
                tracing::error!(%detail, "Error connecting to relay");
                Reply {
                    text: self.replies.connection_failed.clone(),
                    outcome: ReplyOutcome::TransportFailure,
                }
            }
        }
    }

    /// Sends the history and extracts the reply, without any fallback.
    pub async fn request_completion(
        &self,
        history: &[ConversationMessage],
    ) -> Result<String, CompletionError> {
        let request = self.build_request(history);
        let data = self.transport.send(&request).await?;
        tracing::debug!(response = %data, "Relay response");
        extract_text_response(&data)
    }

    pub fn build_request(&self, history: &[ConversationMessage]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: history.iter().map(ChatMessage::from).collect(),
        }
    }
}

/// Pulls `choices[0].message.content` out of a response body.
pub fn extract_text_response(data: &Value) -> Result<String, CompletionError> {
    let choices = data
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| CompletionError::Protocol("missing `choices` array".into()))?;

    choices
        .first()
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            CompletionError::Protocol("`choices[0].message.content` is not a string".into())
        })
}
