//! Error types for the Jay application.

use thiserror::Error;

/// A shared error type for the Jay crates.
///
/// Failures of a single completion request never surface here: they are
/// recovered inside the completion client and turned into fallback text.
/// This type covers configuration, local I/O and session misuse.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JayError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A submission arrived while another one was still awaiting its reply.
    #[error("A message is already being answered; wait for the reply before sending another")]
    SubmissionInFlight,
}

impl JayError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if a submission was turned away by the in-flight guard
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::SubmissionInFlight)
    }
}

impl From<std::io::Error> for JayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// A type alias for `Result<T, JayError>`.
pub type Result<T> = std::result::Result<T, JayError>;
