//! Configuration model.
//!
//! Every field has a default, so an empty or missing config file yields a
//! working setup. Loading from disk lives in `jay-infrastructure`.

use crate::classifier::DEFAULT_KEYWORDS;
use crate::persona::Persona;
use serde::{Deserialize, Serialize};

/// Relay that forwards requests to the hosted model and holds the credentials.
pub const DEFAULT_ENDPOINT: &str = "https://timetraveler.jstroud6.workers.dev/";
pub const DEFAULT_MODEL: &str = "gpt-4o";

pub const DEFAULT_REFUSAL: &str =
    "Sorry, I can only help with L’Oréal Paris products and routines! 😊";
pub const DEFAULT_NO_RESPONSE: &str =
    "Sorry, I couldn't get a response from Jay. Please try again!";
pub const DEFAULT_CONNECTION_FAILED: &str = "Sorry, there was a problem connecting to OpenAI.";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub relay: RelaySettings,
    pub persona: Persona,
    pub topic: TopicSettings,
    pub replies: ReplyTexts,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

/// Where completion requests go.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RelaySettings {
    pub endpoint: String,
    pub model: String,
    /// Request timeout. `None` waits for the transport to settle on its own.
    pub timeout_secs: Option<u64>,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TopicSettings {
    pub keywords: Vec<String>,
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Fixed texts shown in place of a model reply.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReplyTexts {
    /// Off-topic message; no request is sent.
    pub refusal: String,
    /// The relay answered but the reply had no usable content.
    pub no_response: String,
    /// The request itself failed.
    pub connection_failed: String,
}

impl Default for ReplyTexts {
    fn default() -> Self {
        Self {
            refusal: DEFAULT_REFUSAL.to_string(),
            no_response: DEFAULT_NO_RESPONSE.to_string(),
            connection_failed: DEFAULT_CONNECTION_FAILED.to_string(),
        }
    }
}

/// What happens to a submission made while another is awaiting its reply.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Wait for the pending submission, then proceed in arrival order.
    #[default]
    Queue,
    /// Turn the new submission away.
    Reject,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SessionSettings {
    pub overlap: OverlapPolicy,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
