//! Conversation dispatch: the topic-gated completion client and the
//! controller that records and renders each turn.

pub mod completion_client;
pub mod controller;

#[cfg(test)]
mod test_support;

pub use completion_client::{
    ChatCompletionRequest, ChatMessage, CompletionClient, CompletionError, CompletionTransport,
    HttpTransport, Reply, ReplyOutcome, extract_text_response,
};
pub use controller::{ChatController, InteractionResult};
