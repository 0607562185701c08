//! Test doubles for the completion transport, and log capture.

use crate::completion_client::{ChatCompletionRequest, CompletionError, CompletionTransport};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

enum Script {
    Fixed(Result<Value, CompletionError>),
    /// Answers with `"reply to <last message content>"`.
    Echo,
}

/// Records every request and answers from a script.
///
/// A gated transport holds each request until the test releases a permit,
/// which lets tests observe a submission while it is in flight.
pub(crate) struct MockTransport {
    script: Script,
    gate: Option<Semaphore>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl MockTransport {
    fn with_script(script: Script, gate: Option<Semaphore>) -> Self {
        Self {
            script,
            gate,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(body: Value) -> Self {
        Self::with_script(Script::Fixed(Ok(body)), None)
    }

    pub(crate) fn failing(error: CompletionError) -> Self {
        Self::with_script(Script::Fixed(Err(error)), None)
    }

    pub(crate) fn echo() -> Self {
        Self::with_script(Script::Echo, None)
    }

    pub(crate) fn gated_echo() -> Self {
        Self::with_script(Script::Echo, Some(Semaphore::new(0)))
    }

    /// Lets `n` held requests complete.
    pub(crate) fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionTransport for MockTransport {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<Value, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| CompletionError::Transport(e.to_string()))?
                .forget();
        }

        match &self.script {
            Script::Fixed(result) => result.clone(),
            Script::Echo => {
                let last = request
                    .messages
                    .last()
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                Ok(json!({
                    "choices": [{ "message": { "content": format!("reply to {last}") } }]
                }))
            }
        }
    }
}

/// Collects formatted tracing output written on the current thread.
#[derive(Clone, Default)]
pub(crate) struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Routes this thread's events at DEBUG and above into the capture
    /// until the returned guard is dropped.
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
