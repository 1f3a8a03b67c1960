//! # Mock Completion Model for Testing
//!
//! Provides a `MockCompletionModel` that implements the `CompletionModel` trait
//! for use in tests. It returns a predefined text or error so the summarizing
//! pipeline can run without a text-generation service.

use rig::{
    completion::{
        AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    },
    one_or_many::OneOrMany,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

/// A mock completion model for testing purposes.
/// It returns the configured reply for every `completion` call and counts calls.
#[derive(Debug, Clone)]
pub struct MockCompletionModel {
    reply: Arc<Mutex<Option<MockReply>>>,
    calls: Arc<AtomicUsize>,
}

impl MockCompletionModel {
    /// Creates a new mock model that will return an empty text response.
    pub fn new() -> Self {
        Self {
            reply: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Reply with `text` from now on.
    pub async fn set_text_response(&self, text: &str) {
        *self.reply.lock().await = Some(MockReply::Text(text.to_string()));
    }

    /// Fail every request with a provider error carrying `message`.
    pub async fn set_error(&self, message: &str) {
        *self.reply.lock().await = Some(MockReply::Error(message.to_string()));
    }

    /// Number of completion requests received, shared between clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionModel for MockCompletionModel {
    type Response = String;

    async fn completion(
        &self,
        _completion_request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.lock().await.clone();
        let text = match reply {
            Some(MockReply::Error(message)) => return Err(CompletionError::ProviderError(message)),
            Some(MockReply::Text(text)) => text,
            None => String::new(),
        };
        Ok(CompletionResponse {
            choice: OneOrMany::one(AssistantContent::text(&text)),
            raw_response: text,
        })
    }
}
